//! Entity keys.
//!
//! Every catalog entity is addressed by a short key of exactly
//! [`KEY_LEN`] ASCII alphanumeric characters, e.g. `UXMFA`.

use std::fmt;
use std::str::FromStr;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of characters in an entity key.
pub const KEY_LEN: usize = 5;

/// A validated entity key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityKey(String);

/// Error parsing a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key `{0}` must be exactly 5 characters long")]
    InvalidLength(String),

    #[error("key `{0}` must only contain ASCII letters and digits")]
    InvalidCharacter(String),
}

impl EntityKey {
    /// Parse and validate a key.
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        if s.chars().count() != KEY_LEN {
            return Err(KeyError::InvalidLength(s.to_string()));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(KeyError::InvalidCharacter(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Generate a random key of uppercase letters and digits.
    pub fn generate() -> Self {
        let key = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKey({})", self.0)
    }
}

impl FromStr for EntityKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntityKey> for String {
    fn from(key: EntityKey) -> Self {
        key.0
    }
}

impl AsRef<str> for EntityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
