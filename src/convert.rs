//! Markdown to HTML conversion.
//!
//! The [`Converter`] trait is the boundary to whatever turns a document into
//! an HTML fragment. Two implementations ship:
//!
//! | Engine | Type | Notes |
//! |---|---|---|
//! | `builtin` | [`MarkdownConverter`] | pulldown-cmark, in-process, CommonMark + tables/footnotes/strikethrough |
//! | `pandoc` | [`PandocConverter`] | runs `pandoc <file> --to <format>`; needs pandoc on `PATH` |
//!
//! Both take the source file path rather than its text, so a converter is free
//! to read the file however it needs. Front matter is never part of the
//! returned HTML.

use crate::config::{ConvertConfig, ConvertEngine};
use crate::frontmatter;
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported output format '{0}'")]
    UnsupportedFormat(String),
    #[error("Conversion failed: {0}")]
    Failed(String),
}

/// Turns a source document into an HTML fragment.
///
/// `Sync` so one converter can be shared across rayon workers.
pub trait Converter: Sync {
    fn convert(&self, source: &Path, format: &str) -> Result<String, ConvertError>;
}

/// Build the converter selected in config.
pub fn from_config(config: &ConvertConfig) -> Box<dyn Converter> {
    match config.engine {
        ConvertEngine::Builtin => Box::new(MarkdownConverter::new()),
        ConvertEngine::Pandoc => Box::new(PandocConverter::new()),
    }
}

/// In-process CommonMark rendering with pulldown-cmark.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: Options,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Self { options }
    }

    /// Render markdown text (without front matter) to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html = String::new();
        md_html::push_html(&mut html, parser);
        html
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, source: &Path, format: &str) -> Result<String, ConvertError> {
        if !matches!(format, "html" | "html5") {
            return Err(ConvertError::UnsupportedFormat(format.to_string()));
        }
        let text = fs::read_to_string(source)?;
        let (_, body) = frontmatter::split(&text);
        Ok(self.render(body))
    }
}

/// Shells out to `pandoc`, which drops YAML front matter itself.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    pub fn new() -> Self {
        Self::with_program("pandoc")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for PandocConverter {
    fn convert(&self, source: &Path, format: &str) -> Result<String, ConvertError> {
        let output = Command::new(&self.program)
            .arg(source)
            .args(["--from", "markdown", "--to", format])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::Failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ConvertError::Failed(format!("non-UTF-8 output: {e}")))
    }
}
