//! Metadata catalog engine for ACKREP knowledge entities.
//!
//! Knowledge entities live as directories holding a `metadata.yml`
//! descriptor. This crate discovers those directories, parses and checks the
//! descriptors, builds typed [`Entity`] records and indexes them in a
//! [`Catalog`] keyed by their unique five-character key. The
//! [`TemplateRenderer`] generates descriptors and other files from entity
//! fields.
//!
//! ```no_run
//! use ackrep_common_config::CatalogSchema;
//! use ackrep_core::{EntityKind, RepoLoader};
//!
//! # fn main() -> ackrep_core::Result<()> {
//! let loader = RepoLoader::new(&CatalogSchema::default())?;
//! let (catalog, _report) = loader.load_catalog("path/to/repo")?;
//! for solution in catalog.all_by_variant(EntityKind::ProblemSolution) {
//!     println!("{} {}", solution.key(), solution.name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod entity;
pub mod error;
pub mod factory;
pub mod metadata;
pub mod repo;
pub mod scanner;
pub mod template;

pub use catalog::Catalog;
pub use entity::{
    parse_date, Comment, CommonFields, Entity, EntityKind, EntityVariant, MethodPackage,
    ProblemSolution, ProblemSpecification,
};
pub use error::{CatalogError, Result};
pub use factory::EntityFactory;
pub use metadata::{dump, FieldIssue, MetadataLoader};
pub use repo::{DescriptorFailure, RebuildReport, RepoLoader, SolutionCheck};
pub use scanner::{DirectoryScanner, Scan, SkippedEntry};
pub use template::{RenderOutput, TemplateContext, TemplateRenderer};

pub use ackrep_common_core::EntityKey;
