//! The publication pipeline.
//!
//! One build run:
//!
//! 1. mirror the static directory into `<output_dir>/static`
//! 2. discover every `.md` document below the content root
//! 3. render each document (in parallel, see below)
//! 4. write the blog schema feed if any post was rendered
//!
//! ## Per-document states
//!
//! ```text
//! Discovered → MetadataExtracted → Skipped
//!                                → Rendered → Indexed (blog posts only)
//! ```
//!
//! A document is rendered only when its `status` is exactly `published`.
//! Anything that goes wrong with one document (unreadable file, bad front
//! matter, failed conversion, missing template, failed write) is recorded as
//! [`DocumentOutcome::Failed`] and the run continues. Only an unusable content
//! root or a failed feed write stops the build.
//!
//! ## Rendering one document
//!
//! ```text
//! resolve template → convert body → read template → inline partials
//!   → merge site properties → substitute placeholders → write
//! ```
//!
//! ## Parallelism
//!
//! Documents are rendered on rayon's pool. Each document writes only its own
//! output file, and results are collected in discovery order, so the report
//! and the blog feed are identical to a sequential run. Document events are
//! sent as soon as a document and all documents before it have finished, so
//! progress is visible during the build and still arrives in discovery order.

use crate::assets::{self, AssetOutcome};
use crate::blog::{self, BlogPostEntry};
use crate::config::SiteConfig;
use crate::convert::{ConvertError, Converter};
use crate::frontmatter::{self, FrontMatter, FrontMatterError};
use crate::partials;
use crate::placeholder;
use crate::resolve::{self, ResolvedTemplate};
use crate::scan::{self, Document, ScanError};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// `status` value that lets a document through the publication gate.
pub const PUBLISHED: &str = "published";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to write blog index: {0}")]
    BlogIndex(#[from] blog::BlogError),
}

/// Why a single document could not be rendered.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid front matter in {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        source: FrontMatterError,
    },
    #[error("failed to convert {}: {source}", path.display())]
    Convert { path: PathBuf, source: ConvertError },
    #[error("failed to load template {}: {source}", path.display())]
    Template { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Progress notifications, sent in discovery order.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    AssetsCopied {
        destination: PathBuf,
        files: usize,
    },
    AssetsSkipped {
        source: PathBuf,
    },
    AssetsFailed {
        source: PathBuf,
        error: String,
    },
    DocumentRendered {
        source: PathBuf,
        output: PathBuf,
        template: PathBuf,
        indexed: bool,
    },
    DocumentSkipped {
        source: PathBuf,
        status: Option<String>,
    },
    DocumentFailed {
        source: PathBuf,
        error: String,
    },
    BlogIndexWritten {
        path: PathBuf,
        posts: usize,
    },
}

/// What happened to one document.
#[derive(Debug)]
pub enum DocumentOutcome {
    Rendered {
        output: PathBuf,
        template: ResolvedTemplate,
        /// Feed record, present for blog posts only.
        entry: Option<BlogPostEntry>,
    },
    /// Not published; `status` is the value found, if any.
    Skipped { status: Option<String> },
    Failed(DocumentError),
}

#[derive(Debug)]
pub struct DocumentReport {
    pub document: Document,
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    fn event(&self) -> BuildEvent {
        let source = self.document.path.clone();
        match &self.outcome {
            DocumentOutcome::Rendered {
                output,
                template,
                entry,
            } => BuildEvent::DocumentRendered {
                source,
                output: output.clone(),
                template: template.path.clone(),
                indexed: entry.is_some(),
            },
            DocumentOutcome::Skipped { status } => BuildEvent::DocumentSkipped {
                source,
                status: status.clone(),
            },
            DocumentOutcome::Failed(err) => BuildEvent::DocumentFailed {
                source,
                error: err.to_string(),
            },
        }
    }
}

/// Summary of a build run.
#[derive(Debug)]
pub struct BuildReport {
    pub assets: AssetOutcome,
    /// One report per discovered document, in discovery order.
    pub documents: Vec<DocumentReport>,
    /// Location of the feed, if one was written.
    pub blog_index: Option<PathBuf>,
}

impl BuildReport {
    pub fn rendered(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Rendered { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed(_)))
    }

    /// Feed records in discovery order.
    pub fn blog_entries(&self) -> Vec<&BlogPostEntry> {
        self.documents
            .iter()
            .filter_map(|r| match &r.outcome {
                DocumentOutcome::Rendered { entry, .. } => entry.as_ref(),
                _ => None,
            })
            .collect()
    }

    /// Failed documents and their errors.
    pub fn failures(&self) -> Vec<(&Path, &DocumentError)> {
        self.documents
            .iter()
            .filter_map(|r| match &r.outcome {
                DocumentOutcome::Failed(err) => Some((r.document.path.as_path(), err)),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// What a build would do with a document, without converting or writing.
#[derive(Debug)]
pub enum PlannedAction {
    Publish { indexed: bool },
    Skip { status: Option<String> },
    Invalid(DocumentError),
}

#[derive(Debug)]
pub struct PlannedDocument {
    pub document: Document,
    pub template: ResolvedTemplate,
    pub action: PlannedAction,
}

/// A document that passed the publication gate.
struct Publishable {
    front_matter: FrontMatter,
    template: ResolvedTemplate,
}

enum Gate {
    Publish(Publishable),
    Skip {
        template: ResolvedTemplate,
        status: Option<String>,
    },
}

fn resolve_for(config: &SiteConfig, doc: &Document) -> ResolvedTemplate {
    resolve::resolve_template(
        &config.paths.template_dir,
        &config.default_template(),
        &doc.base_name,
        doc.dir_name(),
    )
}

/// Read a document and apply the publication gate.
fn gate(config: &SiteConfig, doc: &Document) -> Result<Gate, DocumentError> {
    let text = fs::read_to_string(&doc.path).map_err(|source| DocumentError::Read {
        path: doc.path.clone(),
        source,
    })?;
    let front_matter = frontmatter::extract(&text).map_err(|source| DocumentError::Metadata {
        path: doc.path.clone(),
        source,
    })?;

    let template = resolve_for(config, doc);
    if front_matter.get_str("status") != Some(PUBLISHED) {
        return Ok(Gate::Skip {
            template,
            status: front_matter.get("status").map(|v| v.render()),
        });
    }
    Ok(Gate::Publish(Publishable {
        front_matter,
        template,
    }))
}

/// Shared, read-only state for rendering documents.
struct RenderContext<'a> {
    config: &'a SiteConfig,
    converter: &'a dyn Converter,
    properties: FrontMatter,
}

impl<'a> RenderContext<'a> {
    fn new(config: &'a SiteConfig, converter: &'a dyn Converter) -> Self {
        Self {
            config,
            converter,
            properties: config.extra_properties(),
        }
    }

    fn process(&self, doc: &Document) -> DocumentOutcome {
        match gate(self.config, doc) {
            Ok(Gate::Skip { status, .. }) => DocumentOutcome::Skipped { status },
            Ok(Gate::Publish(publishable)) => match self.render(doc, publishable) {
                Ok(outcome) => outcome,
                Err(err) => DocumentOutcome::Failed(err),
            },
            Err(err) => DocumentOutcome::Failed(err),
        }
    }

    fn render(
        &self,
        doc: &Document,
        publishable: Publishable,
    ) -> Result<DocumentOutcome, DocumentError> {
        let Publishable {
            front_matter,
            template,
        } = publishable;

        let body_html = self
            .converter
            .convert(&doc.path, &self.config.convert.format)
            .map_err(|source| DocumentError::Convert {
                path: doc.path.clone(),
                source,
            })?;

        let template_error = |source| DocumentError::Template {
            path: template.path.clone(),
            source,
        };
        let template_text = fs::read_to_string(&template.path).map_err(template_error)?;
        let expanded = partials::expand_partials(&self.config.paths.template_dir, &template_text)
            .map_err(template_error)?;

        let mut merged = front_matter.clone();
        merged.merge_fallback(&self.properties);
        let html = placeholder::render(&expanded, &merged, &body_html);

        let output = doc.output_path(&self.config.paths.output_dir);
        write_output(&output, &html).map_err(|source| DocumentError::Write {
            path: output.clone(),
            source,
        })?;

        let entry = blog::is_blog_post(doc, &self.config.blog)
            .then(|| BlogPostEntry::from_document(doc, &front_matter, &self.config.blog));

        Ok(DocumentOutcome::Rendered {
            output,
            template,
            entry,
        })
    }
}

fn write_output(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)
}

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Forwards per-document events in discovery order while rendering runs.
///
/// A finished document's event is held back until every earlier document has
/// finished, then sent together with any later events already waiting.
struct OrderedEvents<'a> {
    events: &'a Option<Sender<BuildEvent>>,
    pending: Mutex<(usize, BTreeMap<usize, BuildEvent>)>,
}

impl<'a> OrderedEvents<'a> {
    fn new(events: &'a Option<Sender<BuildEvent>>) -> Self {
        Self {
            events,
            pending: Mutex::new((0, BTreeMap::new())),
        }
    }

    fn finished(&self, index: usize, event: BuildEvent) {
        if self.events.is_none() {
            return;
        }
        let mut guard = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let (next, waiting) = &mut *guard;
        waiting.insert(index, event);
        while let Some(event) = waiting.remove(&*next) {
            emit(self.events, event);
            *next += 1;
        }
    }
}

/// Copy static assets, reporting instead of failing.
fn mirror_assets(config: &SiteConfig, events: &Option<Sender<BuildEvent>>) -> AssetOutcome {
    let source = &config.paths.static_dir;
    let outcome = assets::mirror_static(source, &config.paths.output_dir)
        .unwrap_or_else(|err| AssetOutcome::Failed(err.to_string()));

    let event = match &outcome {
        AssetOutcome::Copied { files } => BuildEvent::AssetsCopied {
            destination: config.paths.output_dir.join(assets::STATIC_DIRNAME),
            files: *files,
        },
        AssetOutcome::SourceMissing => BuildEvent::AssetsSkipped {
            source: source.clone(),
        },
        AssetOutcome::Failed(error) => BuildEvent::AssetsFailed {
            source: source.clone(),
            error: error.clone(),
        },
    };
    emit(events, event);
    outcome
}

/// Run a full build.
pub fn build(
    config: &SiteConfig,
    converter: &dyn Converter,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let assets = mirror_assets(config, &events);

    let documents = scan::scan(&config.paths.content_dir)?;
    let ctx = RenderContext::new(config, converter);

    let progress = OrderedEvents::new(&events);

    let reports: Vec<DocumentReport> = documents
        .into_par_iter()
        .enumerate()
        .map(|(index, document)| {
            let outcome = ctx.process(&document);
            let report = DocumentReport { document, outcome };
            progress.finished(index, report.event());
            report
        })
        .collect();

    let mut report = BuildReport {
        assets,
        documents: reports,
        blog_index: None,
    };

    let entries: Vec<BlogPostEntry> = report.blog_entries().into_iter().cloned().collect();
    let schema_file = config.schema_file();
    if blog::write_index(&entries, &config.blog, &schema_file)? {
        emit(
            &events,
            BuildEvent::BlogIndexWritten {
                path: schema_file.clone(),
                posts: entries.len(),
            },
        );
        report.blog_index = Some(schema_file);
    }

    Ok(report)
}

/// Decide template and publication for every document without writing.
pub fn plan(config: &SiteConfig) -> Result<Vec<PlannedDocument>, BuildError> {
    let documents = scan::scan(&config.paths.content_dir)?;

    Ok(documents
        .into_iter()
        .map(|document| {
            let (template, action) = match gate(config, &document) {
                Ok(Gate::Publish(p)) => (
                    p.template,
                    PlannedAction::Publish {
                        indexed: blog::is_blog_post(&document, &config.blog),
                    },
                ),
                Ok(Gate::Skip { template, status }) => (template, PlannedAction::Skip { status }),
                Err(err) => (resolve_for(config, &document), PlannedAction::Invalid(err)),
            };
            PlannedDocument {
                document,
                template,
                action,
            }
        })
        .collect())
}
