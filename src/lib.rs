//! # Folio
//!
//! A convention-driven static site generator. Markdown documents with YAML
//! front matter become HTML pages by way of plain-text templates with
//! `$placeholder$` tokens; published blog posts are summarized in a schema.org
//! JSON-LD feed.
//!
//! # Pipeline
//!
//! ```text
//! static/     ──copy──────────────────────────────────→ output/static/
//! content/**.md ─→ front matter ─→ publication gate ─┬─→ output/**.html
//!                                                   └─→ output/blog/schema.json
//! ```
//!
//! For each document the pipeline picks a template by name
//! (`<doc>.html`, then `<dir>.html`, then the default), inlines partial
//! templates, substitutes front matter and site properties, and inserts the
//! converted body. See [`publish`] for the per-document state machine.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading and validation, stock config |
//! | [`frontmatter`] | Front matter parsing; the ordered [`frontmatter::FrontMatter`] mapping |
//! | [`scan`] | Document discovery below the content root |
//! | [`resolve`] | Three-tier template selection |
//! | [`partials`] | Partial template registry and single-pass inlining |
//! | [`placeholder`] | `$key$` substitution, reserved-token cleanup, body insertion |
//! | [`convert`] | Markdown → HTML converters (pulldown-cmark, pandoc) |
//! | [`assets`] | Static directory mirroring |
//! | [`blog`] | Blog membership, `BlogPosting` records, the schema feed |
//! | [`publish`] | The build: gate, render, report |
//! | [`naming`] | Headlines from file names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Templates Are Text
//!
//! Templates are ordinary HTML files with `$name$` tokens, not a template
//! language. There are no loops or conditionals: a token is replaced or it
//! is left alone, except `$title$`, `$date$`, `$tags$` and `$status$`, which
//! never reach the output.
//!
//! ## Publication Is Opt-In
//!
//! Only documents whose front matter says `status: published` produce output.
//! Drafts can live next to published pages without any ignore list.
//!
//! ## One Bad Page Never Stops the Site
//!
//! Every per-document failure is captured in the [`publish::BuildReport`]
//! and printed, and the remaining documents are still built.

pub mod assets;
pub mod blog;
pub mod config;
pub mod convert;
pub mod frontmatter;
pub mod naming;
pub mod output;
pub mod partials;
pub mod placeholder;
pub mod publish;
pub mod resolve;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
