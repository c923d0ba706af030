//! Configuration types for ACKREP.
//!
//! This crate provides the catalog schema used by the metadata loader, the
//! entity factory and the directory scanner, loaded from
//! `.ackrep/config.yaml` files.

pub mod env;
pub mod loader;
pub mod rule;
pub mod types;

pub use env::*;
pub use loader::*;
pub use rule::*;
pub use types::*;
