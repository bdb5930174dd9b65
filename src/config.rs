//! Site configuration module.
//!
//! Handles loading and validating the site's `config.toml`. Configuration is
//! read once at startup into a [`SiteConfig`] and passed explicitly to every
//! stage of the build; nothing reads ambient state.
//!
//! ## Config File Location
//!
//! By default `config.toml` is read from the working directory. The CLI's
//! `--config` flag points at another file. A missing file is not an error:
//! the stock defaults below are used as-is.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! content_dir = "/content"     # Markdown documents
//! output_dir = "/output"       # Rendered site
//! template_dir = "/templates"  # Page templates and partials
//! static_dir = "/static"       # Copied verbatim to <output_dir>/static
//!
//! [templates]
//! default = "default.html"     # Fallback when no name/directory template exists
//!
//! [blog]
//! section = "blog"                  # Directory segment marking blog posts
//! index = "index"                   # Section index page, never listed as a post
//! schema_path = "blog/schema.json"  # Structured-data feed, relative to output_dir
//! fallback_date = "2024-08-25"      # datePublished for posts without a date
//! context = "https://schema.org"
//!
//! [convert]
//! engine = "builtin"           # "builtin" (pulldown-cmark) or "pandoc"
//! format = "html5"
//!
//! [properties]
//! # Free-form site-wide values available to every template, e.g.
//! # site_name = "My Site"
//! ```
//!
//! ## Properties
//!
//! `[properties]` entries fill placeholders a document's own front matter does
//! not define. A document key always wins over a property of the same name.
//!
//! Unknown keys outside `[properties]` are rejected to catch typos early.

use crate::frontmatter::{FrontMatter, MetaValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input and output directories.
    pub paths: PathsConfig,
    /// Template selection settings.
    pub templates: TemplatesConfig,
    /// Blog section detection and schema feed settings.
    pub blog: BlogConfig,
    /// Markdown conversion settings.
    pub convert: ConvertConfig,
    /// Site-wide values merged into every document's front matter.
    pub properties: BTreeMap<String, toml::Value>,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.templates.default.ends_with(".html") {
            return Err(ConfigError::Validation(
                "templates.default must name an .html file".into(),
            ));
        }
        if self.blog.section.trim().is_empty() {
            return Err(ConfigError::Validation(
                "blog.section must not be empty".into(),
            ));
        }
        if self.blog.index.trim().is_empty() {
            return Err(ConfigError::Validation("blog.index must not be empty".into()));
        }
        if self.blog.schema_path.is_absolute() {
            return Err(ConfigError::Validation(
                "blog.schema_path must be relative to paths.output_dir".into(),
            ));
        }
        if self.convert.format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "convert.format must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Path of the fallback template.
    pub fn default_template(&self) -> PathBuf {
        self.paths.template_dir.join(&self.templates.default)
    }

    /// Absolute location of the blog schema feed.
    pub fn schema_file(&self) -> PathBuf {
        self.paths.output_dir.join(&self.blog.schema_path)
    }

    /// `[properties]` as front matter, in key order.
    ///
    /// Arrays become list values; every other TOML value is rendered in its
    /// natural string form.
    pub fn extra_properties(&self) -> FrontMatter {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), property_value(value)))
            .collect()
    }
}

fn property_value(value: &toml::Value) -> MetaValue {
    match value {
        toml::Value::Array(items) => MetaValue::List(items.iter().map(property_scalar).collect()),
        other => MetaValue::Scalar(property_scalar(other)),
    }
}

fn property_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Datetime(dt) => dt.to_string(),
        other => other.to_string(),
    }
}

/// Input and output directory locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("/content"),
            output_dir: PathBuf::from("/output"),
            template_dir: PathBuf::from("/templates"),
            static_dir: PathBuf::from("/static"),
        }
    }
}

/// Template selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// File name (inside `template_dir`) of the fallback template.
    pub default: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            default: "default.html".to_string(),
        }
    }
}

/// Blog section and schema feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Directory segment (case-insensitive) that marks documents as posts.
    pub section: String,
    /// Base name (case-insensitive) of the section's own index page.
    pub index: String,
    /// Feed location relative to `paths.output_dir`.
    pub schema_path: PathBuf,
    /// `datePublished` for posts without a `date` key.
    pub fallback_date: String,
    /// Value of the feed's `@context`.
    pub context: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            section: "blog".to_string(),
            index: "index".to_string(),
            schema_path: PathBuf::from("blog/schema.json"),
            fallback_date: "2024-08-25".to_string(),
            context: "https://schema.org".to_string(),
        }
    }
}

/// Which converter turns markdown into HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertEngine {
    /// In-process pulldown-cmark rendering.
    #[default]
    Builtin,
    /// External `pandoc` executable.
    Pandoc,
}

/// Markdown conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub engine: ConvertEngine,
    /// Target format identifier handed to the converter.
    pub format: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            engine: ConvertEngine::Builtin,
            format: "html5".to_string(),
        }
    }
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `config.toml` file.
///
/// Returns the stock defaults when the file does not exist. Returns `Err` if
/// the file exists but is unreadable, invalid TOML, or fails validation.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys (outside [properties]) will cause an error.

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Markdown documents. Every *.md file below this directory is a candidate page.
content_dir = "/content"

# Rendered site. The directory layout of content_dir is mirrored here.
output_dir = "/output"

# Page templates and partials (*.html).
template_dir = "/templates"

# Copied verbatim to <output_dir>/static, replacing any previous copy.
static_dir = "/static"

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
# Template lookup for content/<dir>/<name>.md, first existing wins:
#   1. <template_dir>/<name>.html
#   2. <template_dir>/<dir>.html
#   3. <template_dir>/<default>
[templates]
default = "default.html"

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Documents below a directory with this name (any depth, case-insensitive)
# are listed in the schema feed.
section = "blog"

# The section's own index page is rendered but never listed.
index = "index"

# Structured-data feed, relative to output_dir.
schema_path = "blog/schema.json"

# datePublished for posts without a date in their front matter.
fallback_date = "2024-08-25"

context = "https://schema.org"

# ---------------------------------------------------------------------------
# Conversion
# ---------------------------------------------------------------------------
[convert]
# "builtin" renders CommonMark in-process; "pandoc" shells out to pandoc.
engine = "builtin"
format = "html5"

# ---------------------------------------------------------------------------
# Properties
# ---------------------------------------------------------------------------
# Site-wide placeholder values. A document's own front matter wins when both
# define the same key.
[properties]
# site_name = "My Site"
# author = "Jane Doe"
"##
}
