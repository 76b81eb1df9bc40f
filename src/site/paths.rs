//! Output path resolution and writing

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Split a path into its directory relative to `source_root` and its file
/// name. A path outside the root gets an empty directory.
pub fn relativize(path: &Path, source_root: &Path) -> (PathBuf, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir = path
        .parent()
        .and_then(|parent| parent.strip_prefix(source_root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    (dir, name)
}

/// Relative output path for `name` in `dir`. A non-empty `extension`
/// replaces the final extension of `name`; an empty one keeps `name` as is.
pub fn compute_destination(dir: &Path, name: &str, extension: &str) -> PathBuf {
    if extension.is_empty() {
        return dir.join(name);
    }
    let stem = match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    };
    dir.join(format!("{}{}", stem, extension))
}

/// Write rendered output, creating parent directories and replacing any
/// existing file
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy a file byte for byte, creating parent directories
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    create_parent(to)?;
    fs::copy(from, to).map_err(|source| Error::Write {
        path: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
