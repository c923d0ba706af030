//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env::EnvOverrides;
use crate::types::AckrepConfig;

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".ackrep";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
    overrides: EnvOverrides,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
            overrides: EnvOverrides::from_env(),
        }
    }

    /// Replace the environment overrides (mainly for tests).
    #[must_use]
    pub fn with_overrides(mut self, overrides: EnvOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.ackrep/config.yaml`, falling back to defaults.
    pub fn load(&self) -> Result<AckrepConfig, ConfigError> {
        let config_path = self.config_path();
        if !config_path.exists() {
            let mut config = AckrepConfig::default();
            self.overrides.apply(&mut config.schema);
            self.validate(&config)?;
            return Ok(config);
        }
        self.load_file(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(&self, path: &Path) -> Result<AckrepConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let mut config = self.parse(&contents)?;
        self.overrides.apply(&mut config.schema);
        self.validate(&config)?;
        Ok(config)
    }

    /// Parse configuration text after environment expansion.
    pub fn parse(&self, contents: &str) -> Result<AckrepConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    fn validate(&self, config: &AckrepConfig) -> Result<(), ConfigError> {
        let schema = &config.schema;
        let invalid = |message: &str| {
            Err(ConfigError::ValidationError {
                message: message.to_string(),
            })
        };

        if schema.descriptor_filename.is_empty()
            || schema.descriptor_filename.contains(['/', '\\'])
        {
            return invalid("descriptor_filename must be a plain, non-empty file name");
        }
        if schema.template_marker_token.chars().count() < 2 {
            return invalid("template_marker_token must be at least two characters long");
        }
        if schema.entity_types.is_empty() {
            return invalid("entity_types must name at least one entity type");
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
        ConfigError::ValidationError {
            message: e.to_string(),
        }
    })?;

    let mut missing = None;
    let expanded = re.replace_all(content, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        match (std::env::var(var_name), cap.get(2)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(expanded.into_owned()),
    }
}
