//! Catalog error type.

use std::fmt;
use std::path::{Path, PathBuf};

use ackrep_common_core::EntityKey;
use thiserror::Error;

/// Errors raised while loading, indexing or rendering catalog entities.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The descriptor is not parseable as a YAML mapping.
    #[error("malformed descriptor{}: {message}", PathSuffix(path))]
    MalformedDescriptor {
        path: Option<PathBuf>,
        message: String,
    },

    /// The sanity check found keys missing from a descriptor.
    #[error("missing required field(s) {}{}", fields.join(", "), PathSuffix(path))]
    MissingRequiredField {
        path: Option<PathBuf>,
        fields: Vec<String>,
    },

    /// The descriptor's `type` is not an accepted entity type.
    #[error("unknown entity type `{type_name}`{}", PathSuffix(path))]
    UnknownEntityType {
        path: Option<PathBuf>,
        type_name: String,
    },

    /// Two entities share a key.
    #[error("duplicate key `{key}`: {} and {}", first.display(), second.display())]
    DuplicateKey {
        key: EntityKey,
        first: PathBuf,
        second: PathBuf,
    },

    /// No entity carries the key.
    #[error("no entity with key `{key}`; make sure the catalog is in sync with the repository")]
    NotFound { key: String },

    /// More than one entity carries the key.
    #[error("{count} entities share key `{key}`")]
    AmbiguousKey { key: String, count: usize },

    /// The output name of a template cannot be derived from its file name.
    #[error(
        "cannot derive output name from template `{file_name}`: marker `{marker}` must occur exactly once and be shorter than the file name"
    )]
    AmbiguousTemplateName { file_name: String, marker: String },

    /// Invalid configuration or call arguments.
    #[error("configuration error: {0}")]
    Config(String),

    /// Template parsing or rendering failed.
    #[error("failed to render template {}: {message}", template.display())]
    Template { template: PathBuf, message: String },

    /// File system failure.
    #[error("{message}")]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl CatalogError {
    /// Attach a descriptor path to errors that do not carry one yet.
    #[must_use]
    pub fn at(mut self, descriptor: &Path) -> Self {
        match &mut self {
            Self::MalformedDescriptor { path, .. }
            | Self::MissingRequiredField { path, .. }
            | Self::UnknownEntityType { path, .. } => {
                if path.is_none() {
                    *path = Some(descriptor.to_path_buf());
                }
            }
            _ => {}
        }
        self
    }

    /// Descriptor or file path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedDescriptor { path, .. }
            | Self::MissingRequiredField { path, .. }
            | Self::UnknownEntityType { path, .. } => path.as_deref(),
            Self::Template { template, .. } => Some(template),
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            path: None,
            message: message.into(),
        }
    }

    pub(crate) fn missing(fields: Vec<String>) -> Self {
        Self::MissingRequiredField { path: None, fields }
    }

    pub(crate) fn io(message: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: path.to_path_buf(),
            source: Some(source),
        }
    }
}

impl From<ackrep_common_core::Error> for CatalogError {
    fn from(err: ackrep_common_core::Error) -> Self {
        match err {
            ackrep_common_core::Error::FileSystem {
                message,
                path,
                source,
            } => Self::Io {
                message,
                path,
                source,
            },
            ackrep_common_core::Error::Io(source) => Self::Io {
                message: source.to_string(),
                path: PathBuf::new(),
                source: Some(source),
            },
            ackrep_common_core::Error::Config(message) => Self::Config(message),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

struct PathSuffix<'a>(&'a Option<PathBuf>);

impl fmt::Display for PathSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(path) => write!(f, " in {}", path.display()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_fills_missing_path_only() {
        let err = CatalogError::malformed("not a mapping").at(Path::new("/r/a/metadata.yml"));
        assert_eq!(err.path(), Some(Path::new("/r/a/metadata.yml")));
        assert_eq!(
            err.to_string(),
            "malformed descriptor in /r/a/metadata.yml: not a mapping"
        );

        let err = err.at(Path::new("/other"));
        assert_eq!(err.path(), Some(Path::new("/r/a/metadata.yml")));
    }

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = CatalogError::missing(vec!["name".into(), "pk".into()])
            .at(Path::new("x/metadata.yml"));
        assert_eq!(
            err.to_string(),
            "missing required field(s) name, pk in x/metadata.yml"
        );
    }

    #[test]
    fn test_duplicate_key_names_both_paths() {
        let err = CatalogError::DuplicateKey {
            key: EntityKey::parse("UXMFA").unwrap(),
            first: PathBuf::from("/r/a"),
            second: PathBuf::from("/r/b"),
        };
        let msg = err.to_string();
        assert!(msg.contains("UXMFA"));
        assert!(msg.contains("/r/a"));
        assert!(msg.contains("/r/b"));
    }
}
