//! File system utilities for the ACKREP catalog.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use ackrep_common_core::{Error, Result};

pub mod path;

pub use path::{absolute, has_marked_component, normalize};

/// Default read limit for descriptor and template files.
pub const DEFAULT_MAX_FILE_SIZE: usize = 4 * 1024 * 1024;

fn read_error(path: &Path, e: io::Error, what: &str) -> Error {
    let message = match e.kind() {
        io::ErrorKind::NotFound => format!("file not found: {}", path.display()),
        io::ErrorKind::PermissionDenied => format!("permission denied: {}", path.display()),
        _ => format!("failed to {what}: {}", path.display()),
    };
    Error::file_system(message, path, Some(e))
}

fn check_size(path: &Path, max_size: usize) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| read_error(path, e, "read metadata"))?;
    if metadata.len() as usize > max_size {
        return Err(Error::file_system(
            format!(
                "file too large: {} bytes (max: {}): {}",
                metadata.len(),
                max_size,
                path.display()
            ),
            path,
            None,
        ));
    }
    Ok(())
}

/// Read a file's raw bytes with size limit.
pub fn read(path: impl AsRef<Path>, max_size: usize) -> Result<Vec<u8>> {
    let path = path.as_ref();
    check_size(path, max_size)?;
    fs::read(path).map_err(|e| read_error(path, e, "read file"))
}

/// Read a file to string with size limit.
pub fn read_to_string(path: impl AsRef<Path>, max_size: usize) -> Result<String> {
    let path = path.as_ref();
    check_size(path, max_size)?;
    fs::read_to_string(path).map_err(|e| read_error(path, e, "read file"))
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent).map_err(|e| {
        Error::file_system(
            format!("failed to create parent directory: {}", parent.display()),
            parent,
            Some(e),
        )
    })?;

    let mut temp_path = path.to_path_buf();
    let temp_name = match path.file_name() {
        Some(name) => format!(".{}.tmp", name.to_string_lossy()),
        None => ".tmp".to_string(),
    };
    temp_path.set_file_name(temp_name);

    let write_err = |e: io::Error| {
        Error::file_system(
            format!("failed to write temporary file: {}", temp_path.display()),
            &temp_path,
            Some(e),
        )
    };

    {
        let mut file = File::create(&temp_path).map_err(write_err)?;
        file.write_all(contents).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::file_system(
            format!("failed to replace target file: {}", path.display()),
            path,
            Some(e),
        )
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}
