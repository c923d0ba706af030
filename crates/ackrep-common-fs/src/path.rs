//! Path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` without hitting the filesystem.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let mut components = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => {
                components.clear();
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::ParentDir) | None => components.push(Component::ParentDir),
                // never climb above a root or prefix
                Some(_) => {}
            },
            Component::Normal(c) => components.push(Component::Normal(c)),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolve `path` against the current directory and normalize it.
///
/// Does not require the path to exist and does not follow symlinks.
pub fn absolute(path: impl AsRef<Path>) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    Ok(normalize(std::env::current_dir()?.join(path)))
}

/// Whether any component of `path` below `base` contains `marker`.
///
/// Components of `base` itself are not inspected, so a catalog rooted inside
/// a directory whose name happens to contain the marker is still scanned.
pub fn has_marked_component(path: &Path, base: &Path, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().contains(marker),
        _ => false,
    })
}

/// Find the nearest ancestor of `start` that contains `marker`.
pub fn find_root_with(start: impl AsRef<Path>, marker: &str) -> Option<PathBuf> {
    let mut current = start.as_ref().to_path_buf();

    loop {
        if current.join(marker).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}
