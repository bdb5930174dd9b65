//! Static asset mirroring.
//!
//! The static directory is copied to `<output_dir>/static` before any
//! document is rendered. The destination is removed first, so files deleted
//! from the source do not linger in the output. A missing source directory
//! is not an error; the step is skipped.
//!
//! Symlinks inside the static directory are followed: linked files and
//! directories are copied as regular content.

use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the asset directory inside the output root.
pub const STATIC_DIRNAME: &str = "static";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk static directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of the mirror step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// The tree was copied; `files` regular files were written.
    Copied { files: usize },
    /// No static directory exists; nothing was touched.
    SourceMissing,
    /// Copying failed; the build continues without a fresh copy.
    Failed(String),
}

/// Replace `<output_dir>/static` with a fresh copy of `static_dir`.
pub fn mirror_static(static_dir: &Path, output_dir: &Path) -> Result<AssetOutcome, AssetError> {
    if !static_dir.is_dir() {
        return Ok(AssetOutcome::SourceMissing);
    }

    let destination = output_dir.join(STATIC_DIRNAME);
    if destination.exists() {
        fs::remove_dir_all(&destination)?;
    }

    let files = copy_dir_recursive(static_dir, &destination)?;
    Ok(AssetOutcome::Copied { files })
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, AssetError> {
    fs::create_dir_all(dst)?;
    let mut files = 0;
    for entry in WalkDir::new(src)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}
