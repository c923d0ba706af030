//! Test utilities for ACKREP crates.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tempfile::TempDir;

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// A complete descriptor mapping with every generic key set.
pub fn descriptor(pk: &str, entity_type: &str, name: &str) -> Mapping {
    let mut m = Mapping::new();
    let mut put = |k: &str, v: Value| {
        m.insert(Value::String(k.to_string()), v);
    };
    let empty = || Value::Sequence(Vec::new());

    put("pk", pk.into());
    put("type", entity_type.into());
    put("name", name.into());
    put("short_description", format!("Fixture entity {pk}").into());
    put("version", "1.0.0-rc1".into());
    put("tags", Value::Sequence(vec!["fixture".into()]));
    put("creator", "ackrep-tests".into());
    put("editors", empty());
    put("creation_date", "2021-03-04".into());
    put("related_docs", empty());
    put("related_datasets", empty());
    put("external_references", empty());
    put("notes", "".into());
    m
}

/// A repository tree in a temporary directory.
pub struct RepoFixture {
    dir: TempDir,
}

impl RepoFixture {
    pub fn new() -> Self {
        Self { dir: temp_dir() }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Write `mapping` as `<entity_dir>/metadata.yml`.
    pub fn write_descriptor(&self, entity_dir: impl AsRef<Path>, mapping: &Mapping) -> PathBuf {
        let text = serde_yaml::to_string(mapping).expect("Failed to serialize descriptor");
        self.write_file(entity_dir.as_ref().join("metadata.yml"), &text)
    }

    /// Write a complete descriptor for a new entity and return its path.
    pub fn entity(&self, entity_dir: impl AsRef<Path>, pk: &str, entity_type: &str) -> PathBuf {
        self.write_descriptor(entity_dir, &descriptor(pk, entity_type, &format!("Entity {pk}")))
    }

    /// Absolute directory of `rel` inside the fixture.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root().join(rel)
    }
}

impl Default for RepoFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
