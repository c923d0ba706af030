//! Descriptor discovery.

use std::path::{Path, PathBuf};

use ackrep_common_config::CatalogSchema;
use ackrep_common_fs::has_marked_component;
use serde::Serialize;
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Default marker of scaffold directories excluded from discovery.
pub const DEFAULT_TEMPLATE_DIR_MARKER: &str = "_template";

/// An entry the scanner could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Walks a directory tree for files whose name matches a predicate.
///
/// Any directory below the root whose name contains the template marker is
/// pruned together with everything beneath it. Only components below the root
/// are checked, so a root that itself sits inside a marked directory is still
/// scanned. Directory links are not followed; file links are yielded when they
/// resolve to a regular file. Unreadable entries and broken links are skipped
/// with a warning and recorded on the [`Scan`].
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    marker: String,
}

impl DirectoryScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn from_schema(schema: &CatalogSchema) -> Self {
        Self::new(schema.template_dir_marker.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Lazily yield every file below `root` whose file name satisfies
    /// `predicate`. Each call starts a fresh walk.
    pub fn scan<P>(&self, root: impl AsRef<Path>, predicate: P) -> Scan<P>
    where
        P: FnMut(&str) -> bool,
    {
        let root = root.as_ref().to_path_buf();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Scan {
            root,
            marker: self.marker.clone(),
            walker,
            predicate,
            skipped: Vec::new(),
        }
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_DIR_MARKER)
    }
}

/// Iterator returned by [`DirectoryScanner::scan`].
pub struct Scan<P> {
    root: PathBuf,
    marker: String,
    walker: walkdir::IntoIter,
    predicate: P,
    skipped: Vec<SkippedEntry>,
}

impl<P> Scan<P> {
    /// Entries skipped so far.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn into_skipped(self) -> Vec<SkippedEntry> {
        self.skipped
    }
}

impl<P> Iterator for Scan<P>
where
    P: FnMut(&str) -> bool,
{
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    self.skipped.push(SkippedEntry {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if entry.depth() > 0 && has_marked_component(entry.path(), &self.root, &self.marker) {
                if entry.file_type().is_dir() {
                    trace!(path = %entry.path().display(), "pruning template directory");
                    self.walker.skip_current_dir();
                }
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() || !(self.predicate)(&entry.file_name().to_string_lossy()) {
                continue;
            }
            if file_type.is_file() {
                return Some(entry.into_path());
            }

            // links are not followed during the walk; a matching one counts
            // when it resolves to a regular file
            if entry.path_is_symlink() {
                match std::fs::metadata(entry.path()) {
                    Ok(meta) if meta.is_file() => return Some(entry.into_path()),
                    Ok(_) => trace!(path = %entry.path().display(), "ignoring link to non-file"),
                    Err(err) => {
                        warn!(path = %entry.path().display(), error = %err, "skipping broken link");
                        self.skipped.push(SkippedEntry {
                            path: entry.into_path(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
    }
}
