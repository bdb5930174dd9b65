//! Blog schema feed.
//!
//! Published documents below the blog section are summarized as schema.org
//! `BlogPosting` records and written once, after every document has been
//! processed, to a JSON-LD file:
//!
//! ```json
//! {
//!   "@context": "https://schema.org",
//!   "@type": "Blog",
//!   "blogPost": [
//!     {
//!       "@type": "BlogPosting",
//!       "headline": "Hello World",
//!       "url": "post1.html",
//!       "datePublished": "2024-01-01",
//!       "keywords": "intro, news"
//!     }
//!   ]
//! }
//! ```
//!
//! ## Membership
//!
//! A document is a post when any segment of its directory path (relative to
//! the content root, compared case-insensitively) equals the section name,
//! and its base name is not the section index name. `blog/index.md` is the
//! section's landing page: rendered, never listed. Both comparisons use the
//! same Unicode lowercasing.
//!
//! ## Entry fields
//!
//! Headline, date and keywords come from the document's own front matter.
//! Site-wide `[properties]` are merged in for template substitution only and
//! never reach the feed, so a site `title` is not every post's headline.

use crate::config::BlogConfig;
use crate::frontmatter::{FrontMatter, MetaValue};
use crate::naming;
use crate::scan::Document;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One `BlogPosting` in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPostEntry {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    /// Output file name, not the full path.
    pub url: String,
    #[serde(rename = "datePublished")]
    pub date_published: String,
    pub keywords: String,
}

impl BlogPostEntry {
    /// Summarize a rendered document.
    ///
    /// `front_matter` is the document's own metadata, before site-wide
    /// properties are merged in.
    pub fn from_document(doc: &Document, front_matter: &FrontMatter, config: &BlogConfig) -> Self {
        let headline = front_matter
            .get("title")
            .map(MetaValue::render)
            .unwrap_or_else(|| naming::humanize(&doc.base_name));

        let date = front_matter
            .get("date")
            .map(MetaValue::render)
            .unwrap_or_else(|| config.fallback_date.clone());

        let keywords = front_matter
            .get("tags")
            .map(MetaValue::render)
            .unwrap_or_default();

        Self {
            kind: "BlogPosting",
            headline,
            url: doc.output_file_name(),
            date_published: normalize_date(&date),
            keywords,
        }
    }
}

/// The whole feed document.
#[derive(Debug, Serialize)]
pub struct BlogIndex<'a> {
    #[serde(rename = "@context")]
    pub context: &'a str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "blogPost")]
    pub blog_post: &'a [BlogPostEntry],
}

/// Whether a document belongs in the feed.
pub fn is_blog_post(doc: &Document, config: &BlogConfig) -> bool {
    let section = config.section.to_lowercase();
    doc.dir_segments().iter().any(|seg| *seg == section)
        && doc.base_name.to_lowercase() != config.index.to_lowercase()
}

/// Reduce date-like text to a `YYYY-MM-DD` calendar date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`
/// and plain dates. Anything else is returned unchanged.
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().to_string();
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return dt.date().to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.to_string();
    }
    value.to_string()
}

/// Serialize the feed as pretty-printed JSON.
pub fn render_index(entries: &[BlogPostEntry], config: &BlogConfig) -> Result<String, BlogError> {
    let index = BlogIndex {
        context: &config.context,
        kind: "Blog",
        blog_post: entries,
    };
    Ok(serde_json::to_string_pretty(&index)?)
}

/// Write the feed to `path`.
///
/// Does nothing (no file, no directory) when `entries` is empty. Returns
/// whether a file was written.
pub fn write_index(
    entries: &[BlogPostEntry],
    config: &BlogConfig,
    path: &Path,
) -> Result<bool, BlogError> {
    if entries.is_empty() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_index(entries, config)?)?;
    Ok(true)
}
