//! Document discovery.
//!
//! Walks the content root and returns every markdown document below it. A
//! file is a document iff its name ends in `.md`; nothing else in the tree is
//! looked at.
//!
//! ## Ordering
//!
//! Entries are visited in file-name order within each directory (files and
//! subdirectories interleaved, depth-first), so the same tree always yields
//! the same document sequence. The blog feed lists posts in this order.
//!
//! ```text
//! content/
//! ├── about.md          → 1
//! ├── blog/
//! │   ├── index.md      → 2
//! │   └── post1.md      → 3
//! └── contact.md        → 4
//! ```

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// File name suffix marking a document.
pub const MARKDOWN_SUFFIX: &str = ".md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Full path to the markdown file.
    pub path: PathBuf,
    /// File name without the `.md` suffix.
    pub base_name: String,
    /// Containing directory relative to the content root (empty at the root).
    pub rel_dir: PathBuf,
}

impl Document {
    /// Build a document from a path below `root`.
    ///
    /// Returns `None` if the path is not below `root` or is not a markdown file.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let base_name = file_name.strip_suffix(MARKDOWN_SUFFIX)?;
        let rel_dir = path.parent()?.strip_prefix(root).ok()?.to_path_buf();
        Some(Self {
            path: path.to_path_buf(),
            base_name: base_name.to_string(),
            rel_dir,
        })
    }

    /// Innermost containing directory name, empty for documents at the root.
    pub fn dir_name(&self) -> &str {
        self.rel_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Lowercased segments of the containing directory path.
    pub fn dir_segments(&self) -> Vec<String> {
        self.rel_dir
            .components()
            .filter_map(|c| match c {
                Component::Normal(seg) => Some(seg.to_string_lossy().to_lowercase()),
                _ => None,
            })
            .collect()
    }

    /// Output file location: `<output_dir>/<rel_dir>/<base_name>.html`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir
            .join(&self.rel_dir)
            .join(self.output_file_name())
    }

    /// Output file name without directories, e.g. `post1.html`.
    pub fn output_file_name(&self) -> String {
        format!("{}.html", self.base_name)
    }
}

/// Find every markdown document below `root`, in traversal order.
///
/// Any error walking the tree is fatal: without a readable tree there is
/// nothing to build.
pub fn scan(root: &Path) -> Result<Vec<Document>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        // Follows symlinks, so a linked markdown file counts as a document.
        if !entry.path().is_file() {
            continue;
        }
        if let Some(doc) = Document::from_path(root, entry.path()) {
            documents.push(doc);
        }
    }
    Ok(documents)
}
