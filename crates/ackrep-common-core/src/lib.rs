//! ACKREP common core types and utilities.

pub mod error;
pub mod key;

pub use error::{Error, Result};
pub use key::{EntityKey, KeyError, KEY_LEN};
