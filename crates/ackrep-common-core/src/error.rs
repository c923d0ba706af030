//! Error types shared by the ACKREP support crates.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for ACKREP support operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error with custom message.
    #[error("{0}")]
    Generic(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error bound to a path.
    #[error("{message}")]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new generic error.
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a file system error for `path`.
    pub fn file_system(
        message: impl Into<String>,
        path: impl AsRef<Path>,
        source: Option<std::io::Error>,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileSystem { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The underlying I/O error kind, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::FileSystem { source: Some(e), .. } | Self::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type alias using the common `Error`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_error_keeps_path() {
        let err = Error::file_system(
            "file not found: /x/metadata.yml",
            "/x/metadata.yml",
            Some(std::io::Error::from(std::io::ErrorKind::NotFound)),
        );
        assert_eq!(err.path(), Some(Path::new("/x/metadata.yml")));
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), "file not found: /x/metadata.yml");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("marker token too short");
        assert_eq!(err.to_string(), "Configuration error: marker token too short");
        assert!(err.path().is_none());
    }
}
