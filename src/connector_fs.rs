//! Directory scanner: lists the supported documents directly inside a directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use docindex_core::{Error, Result};

use crate::extract::SUPPORTED_EXTENSIONS;

/// Return the sorted, absolute paths of supported files in `dir`.
///
/// Only regular files directly inside `dir` are considered; subdirectories
/// are not descended. Extensions match case-insensitively, so `REPORT.PDF`
/// is picked up alongside `notes.txt`.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let root = dir.canonicalize().map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let walker = WalkDir::new(&root).min_depth(1).max_depth(1);
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io {
            path: root.clone(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_supported_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    // Sort for deterministic ordering
    files.sort();

    Ok(files)
}

/// Lowercased extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn has_supported_extension(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
