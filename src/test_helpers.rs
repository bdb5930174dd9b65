//! Shared test utilities for the folio test suite.
//!
//! [`SiteFixture`] lays out an isolated site in a temp directory and points a
//! [`SiteConfig`] at it, so pipeline tests never touch the real filesystem
//! defaults (`/content`, `/output`, ...).
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new()
//!     .template("default.html", "<html>$title$ $body$</html>")
//!     .content("blog/post1.md", "---\nstatus: published\n---\n# Hi\n");
//!
//! let report = publish::build(&site.config, &MockConverter::new(), None).unwrap();
//! assert_eq!(site.read_output("blog/post1.html"), "<html> <p>post1.md</p></html>");
//! ```

use crate::config::SiteConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway site: `content/`, `templates/`, `static/` and an (absent)
/// `output/` under one temp directory.
pub struct SiteFixture {
    pub tmp: TempDir,
    pub config: SiteConfig,
}

impl SiteFixture {
    /// Create empty content, template and static directories.
    ///
    /// The output directory is not created; the build creates what it needs.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.paths.content_dir = tmp.path().join("content");
        config.paths.output_dir = tmp.path().join("output");
        config.paths.template_dir = tmp.path().join("templates");
        config.paths.static_dir = tmp.path().join("static");

        for dir in [
            &config.paths.content_dir,
            &config.paths.template_dir,
            &config.paths.static_dir,
        ] {
            fs::create_dir_all(dir).unwrap();
        }

        Self { tmp, config }
    }

    /// Write a markdown document below the content root.
    pub fn content(self, rel: &str, text: &str) -> Self {
        write_file(&self.config.paths.content_dir, rel, text);
        self
    }

    /// Write a template file.
    pub fn template(self, name: &str, text: &str) -> Self {
        write_file(&self.config.paths.template_dir, name, text);
        self
    }

    /// Write a static asset.
    pub fn asset(self, rel: &str, text: &str) -> Self {
        write_file(&self.config.paths.static_dir, rel, text);
        self
    }

    /// Add a site-wide string property.
    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.config
            .properties
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        self
    }

    /// Absolute path of a file or directory below the output root.
    pub fn output_path(&self, rel: &str) -> PathBuf {
        self.config.paths.output_dir.join(rel)
    }

    /// Read an output file. Panics with the output tree listing on miss.
    pub fn read_output(&self, rel: &str) -> String {
        let path = self.output_path(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| {
            panic!(
                "output '{rel}' not readable ({e}). Output tree: {:?}",
                list_files(&self.config.paths.output_dir)
            )
        })
    }
}

fn write_file(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn list_files(root: &Path) -> Vec<String> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().display().to_string())
        .collect()
}
