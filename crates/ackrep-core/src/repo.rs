//! Catalog rebuilds from a repository on disk.

use std::path::{Path, PathBuf};

use ackrep_common_config::CatalogSchema;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::entity::Entity;
use crate::error::{CatalogError, Result};
use crate::factory::EntityFactory;
use crate::metadata::MetadataLoader;
use crate::scanner::{DirectoryScanner, SkippedEntry};

/// A descriptor that could not be turned into an entity.
#[derive(Debug)]
pub struct DescriptorFailure {
    pub path: PathBuf,
    pub error: CatalogError,
}

/// Outcome of a successful rebuild.
#[derive(Debug)]
pub struct RebuildReport {
    /// Absolute repository root.
    pub root: PathBuf,
    pub loaded: usize,
    /// Descriptors left out of the catalog; the rebuild continued past them.
    pub failures: Vec<DescriptorFailure>,
    /// Entries the scanner could not read.
    pub skipped: Vec<SkippedEntry>,
}

impl RebuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }
}

/// Where a solution descriptor points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionCheck {
    pub path: PathBuf,
    pub exists: bool,
}

/// Populates a [`Catalog`] from descriptor files below a root directory.
#[derive(Debug, Clone)]
pub struct RepoLoader {
    schema: CatalogSchema,
    scanner: DirectoryScanner,
    loader: MetadataLoader,
    factory: EntityFactory,
}

impl RepoLoader {
    pub fn new(schema: &CatalogSchema) -> Result<Self> {
        Ok(Self {
            schema: schema.clone(),
            scanner: DirectoryScanner::from_schema(schema),
            loader: MetadataLoader::new(schema),
            factory: EntityFactory::new(schema)?,
        })
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    pub fn metadata_loader(&self) -> &MetadataLoader {
        &self.loader
    }

    /// Clear `catalog` and refill it from the descriptors below `root`.
    ///
    /// Entities are collected into a fresh catalog that replaces `catalog`
    /// only once the scan has finished. A duplicate key aborts the rebuild
    /// and leaves `catalog` empty. Descriptors that fail to parse or
    /// construct are reported and skipped.
    pub fn rebuild(&self, catalog: &mut Catalog, root: impl AsRef<Path>) -> Result<RebuildReport> {
        catalog.clear();

        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::Io {
                message: format!("repository root is not a directory: {}", root.display()),
                path: root.to_path_buf(),
                source: None,
            });
        }
        let root = ackrep_common_fs::absolute(root)
            .map_err(|e| CatalogError::io("failed to resolve repository root", root, e))?;

        let mut fresh = Catalog::new();
        let mut failures = Vec::new();
        let mut scan = self
            .scanner
            .scan(&root, |name| self.schema.is_descriptor(name));

        for descriptor in scan.by_ref() {
            debug!(path = %descriptor.display(), "loading descriptor");
            match self.load_entity(&descriptor) {
                Ok(entity) => fresh.insert(entity)?,
                Err(error) => {
                    warn!(path = %descriptor.display(), %error, "skipping descriptor");
                    failures.push(DescriptorFailure {
                        path: descriptor,
                        error,
                    });
                }
            }
        }

        let report = RebuildReport {
            root,
            loaded: fresh.len(),
            failures,
            skipped: scan.into_skipped(),
        };
        *catalog = fresh;

        info!(
            root = %report.root.display(),
            entities = report.loaded,
            failures = report.failures.len(),
            skipped = report.skipped.len(),
            "catalog rebuilt"
        );
        Ok(report)
    }

    /// Rebuild into a new catalog.
    pub fn load_catalog(&self, root: impl AsRef<Path>) -> Result<(Catalog, RebuildReport)> {
        let mut catalog = Catalog::new();
        let report = self.rebuild(&mut catalog, root)?;
        Ok((catalog, report))
    }

    /// Load one descriptor as an entity located in its parent directory.
    pub fn load_entity(&self, descriptor: &Path) -> Result<Entity> {
        let mapping = self
            .loader
            .load(descriptor, self.schema.check_sanity_on_rebuild)?;
        let entity = self
            .factory
            .construct(&mapping)
            .map_err(|e| e.at(descriptor))?;
        Ok(entity.with_base_path(entity_dir(descriptor)?))
    }

    /// Resolve the `solution_file` a descriptor names against its directory.
    pub fn solution_path(&self, descriptor: impl AsRef<Path>) -> Result<SolutionCheck> {
        let descriptor = descriptor.as_ref();
        let mapping = self.loader.load(descriptor, false)?;
        let solution_file = mapping
            .get("solution_file")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| CatalogError::missing(vec!["solution_file".to_string()]).at(descriptor))?;

        let path = entity_dir(descriptor)?.join(solution_file);
        let exists = path.is_file();
        Ok(SolutionCheck { path, exists })
    }
}

/// Absolute directory containing `descriptor`.
fn entity_dir(descriptor: &Path) -> Result<PathBuf> {
    let absolute = ackrep_common_fs::absolute(descriptor)
        .map_err(|e| CatalogError::io("failed to resolve descriptor path", descriptor, e))?;
    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    fn loader() -> RepoLoader {
        RepoLoader::new(&CatalogSchema::default()).unwrap()
    }

    #[test]
    fn test_rebuild_sets_absolute_base_paths() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/primer/metadata.yml", "pk: DOC01\ntype: doc\n");

        let (catalog, report) = loader().load_catalog(dir.path()).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(report.is_clean());

        let entity = catalog.find_by_key("DOC01").unwrap();
        assert!(entity.base_path().is_absolute());
        assert!(entity.base_path().ends_with("docs/primer"));
    }

    #[test]
    fn test_rebuild_reports_bad_descriptors_and_continues() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/metadata.yml", "pk: AAAAA\ntype: doc\n");
        let bad = write(dir.path(), "b/metadata.yml", "pk: BBBBB\ntype: system_model\n");

        let (catalog, report) = loader().load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("b/metadata.yml"));
        assert!(matches!(
            &report.failures[0].error,
            CatalogError::UnknownEntityType { path: Some(p), .. } if p == &bad
        ));
    }

    #[test]
    fn test_rebuild_with_sanity_flag_rejects_incomplete_descriptors() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/metadata.yml", "pk: AAAAA\ntype: doc\n");

        let schema = CatalogSchema::default().with_sanity_on_rebuild(true);
        let (catalog, report) = RepoLoader::new(&schema)
            .unwrap()
            .load_catalog(dir.path())
            .unwrap();
        assert!(catalog.is_empty());
        assert!(matches!(
            report.failures[0].error,
            CatalogError::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn test_rebuild_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let mut catalog = Catalog::new();
        let err = loader()
            .rebuild(&mut catalog, dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_solution_path() {
        let dir = TempDir::new().unwrap();
        let descriptor = write(
            dir.path(),
            "solutions/s1/metadata.yml",
            "pk: SOL01\ntype: problem_solution\nsolution_file: solution.py\n",
        );

        let check = loader().solution_path(&descriptor).unwrap();
        assert!(!check.exists);
        assert!(check.path.ends_with("solutions/s1/solution.py"));

        write(dir.path(), "solutions/s1/solution.py", "print('ok')\n");
        assert!(loader().solution_path(&descriptor).unwrap().exists);
    }

    #[test]
    fn test_solution_path_requires_solution_file() {
        let dir = TempDir::new().unwrap();
        let descriptor = write(dir.path(), "d/metadata.yml", "pk: DOC01\ntype: doc\n");
        assert!(matches!(
            loader().solution_path(&descriptor),
            Err(CatalogError::MissingRequiredField { .. })
        ));
    }
}
