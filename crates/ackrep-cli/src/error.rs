//! CLI error handling.

use std::path::PathBuf;

use ackrep_common_config::ConfigError;
use ackrep_core::CatalogError;
use thiserror::Error;

use crate::Exit;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<ConfigError>,
    },

    #[error("{message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Catalog(CatalogError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Exit code for this error
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Validation(_) => Exit::ValidationError,
            Self::Catalog(err) => match err {
                CatalogError::Config(_) => Exit::ConfigError,
                CatalogError::Io { .. } => Exit::IoError,
                CatalogError::MalformedDescriptor { .. }
                | CatalogError::MissingRequiredField { .. }
                | CatalogError::UnknownEntityType { .. }
                | CatalogError::DuplicateKey { .. }
                | CatalogError::AmbiguousTemplateName { .. } => Exit::ValidationError,
                CatalogError::NotFound { .. }
                | CatalogError::AmbiguousKey { .. }
                | CatalogError::Template { .. } => Exit::GeneralError,
            },
            Self::Other(_) => Exit::GeneralError,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_map_to_exit_codes() {
        let code = |err: CatalogError| CliError::from(err).exit() as u8;

        assert_eq!(code(CatalogError::Config("bare".into())), 2);
        assert_eq!(
            code(CatalogError::NotFound {
                key: "ABCDE".into()
            }),
            1
        );
        assert_eq!(
            code(CatalogError::UnknownEntityType {
                path: None,
                type_name: "x".into()
            }),
            5
        );
        assert_eq!(
            code(CatalogError::Io {
                message: "gone".into(),
                path: PathBuf::from("/x"),
                source: None,
            }),
            3
        );
    }
}
