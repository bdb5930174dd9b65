//! Template selection by naming convention.
//!
//! For `content/<dir>/<name>.md` the first existing file wins:
//!
//! 1. `<template_dir>/<name>.html` — per-document override
//! 2. `<template_dir>/<dir>.html` — per-section template (innermost directory)
//! 3. the configured default template
//!
//! The default is returned without checking that it exists; a missing default
//! surfaces as a read error when the document is rendered.

use std::path::{Path, PathBuf};

/// Which tier of the lookup produced a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Document,
    Directory,
    Default,
}

/// A resolved template path and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub path: PathBuf,
    pub source: TemplateSource,
}

/// Resolve the template governing a document.
///
/// `dir_name` is the innermost containing directory name; documents at the
/// content root pass an empty string and skip the directory tier.
pub fn resolve_template(
    template_dir: &Path,
    default_template: &Path,
    base_name: &str,
    dir_name: &str,
) -> ResolvedTemplate {
    let by_name = template_dir.join(format!("{base_name}.html"));
    if by_name.is_file() {
        return ResolvedTemplate {
            path: by_name,
            source: TemplateSource::Document,
        };
    }

    if !dir_name.is_empty() {
        let by_dir = template_dir.join(format!("{dir_name}.html"));
        if by_dir.is_file() {
            return ResolvedTemplate {
                path: by_dir,
                source: TemplateSource::Directory,
            };
        }
    }

    ResolvedTemplate {
        path: default_template.to_path_buf(),
        source: TemplateSource::Default,
    }
}
