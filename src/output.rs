//! CLI output formatting for build and check runs.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Static: copied 3 files → /output/static
//! rendered blog/post1.md → blog/post1.html (blog.html) [post]
//! skipped  blog/draft.md (status: draft)
//! FAILED   notes/broken.md
//!     invalid front matter in /content/notes/broken.md: ...
//! Blog index: 1 post → /output/blog/schema.json
//!
//! Rendered 1, skipped 1, failed 1
//! ```
//!
//! ## Check
//!
//! ```text
//! publish  blog/post1.md  (blog.html) [post]
//! skip     blog/draft.md  (status: draft)
//! invalid  notes/broken.md
//!     invalid front matter in ...
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::publish::{BuildEvent, BuildReport, PlannedAction, PlannedDocument};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Show `path` relative to `root` when possible, with `/` separators.
fn display_rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn status_label(status: Option<&str>) -> String {
    match status {
        Some(s) => format!("(status: {s})"),
        None => "(no status)".to_string(),
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format one pipeline event.
///
/// Paths are shown relative to the content and output roots.
pub fn format_build_event(event: &BuildEvent, content_root: &Path, output_root: &Path) -> Vec<String> {
    match event {
        BuildEvent::AssetsCopied { destination, files } => vec![format!(
            "Static: copied {} → {}",
            plural(*files, "file"),
            destination.display()
        )],
        BuildEvent::AssetsSkipped { source } => vec![format!(
            "Static: {} not found, skipping copy",
            source.display()
        )],
        BuildEvent::AssetsFailed { source, error } => vec![
            format!("Static: FAILED to copy {}", source.display()),
            format!("{}{}", indent(1), error),
        ],
        BuildEvent::DocumentRendered {
            source,
            output,
            template,
            indexed,
        } => {
            let mut line = format!(
                "rendered {} → {} ({})",
                display_rel(source, content_root),
                display_rel(output, output_root),
                file_name(template)
            );
            if *indexed {
                line.push_str(" [post]");
            }
            vec![line]
        }
        BuildEvent::DocumentSkipped { source, status } => vec![format!(
            "skipped  {} {}",
            display_rel(source, content_root),
            status_label(status.as_deref())
        )],
        BuildEvent::DocumentFailed { source, error } => vec![
            format!("FAILED   {}", display_rel(source, content_root)),
            format!("{}{}", indent(1), error),
        ],
        BuildEvent::BlogIndexWritten { path, posts } => vec![format!(
            "Blog index: {} → {}",
            plural(*posts, "post"),
            path.display()
        )],
    }
}

/// Format the end-of-run summary.
pub fn format_report(report: &BuildReport) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Rendered {}, skipped {}, failed {}",
            report.rendered(),
            report.skipped(),
            report.failed()
        ),
    ]
}

pub fn print_report(report: &BuildReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the per-document plan of a check run.
pub fn format_plan(plan: &[PlannedDocument], content_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let mut publish = 0;

    for planned in plan {
        let source = display_rel(&planned.document.path, content_root);
        match &planned.action {
            PlannedAction::Publish { indexed } => {
                publish += 1;
                let mut line = format!(
                    "publish  {}  ({})",
                    source,
                    file_name(&planned.template.path)
                );
                if *indexed {
                    line.push_str(" [post]");
                }
                lines.push(line);
            }
            PlannedAction::Skip { status } => {
                lines.push(format!(
                    "skip     {}  {}",
                    source,
                    status_label(status.as_deref())
                ));
            }
            PlannedAction::Invalid(err) => {
                lines.push(format!("invalid  {}", source));
                lines.push(format!("{}{}", indent(1), err));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} found, {} to publish",
        plural(plan.len(), "document"),
        publish
    ));
    lines
}

pub fn print_plan(plan: &[PlannedDocument], content_root: &Path) {
    for line in format_plan(plan, content_root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetOutcome;
    use crate::publish::{DocumentError, DocumentOutcome, DocumentReport};
    use crate::resolve::{ResolvedTemplate, TemplateSource};
    use crate::scan::Document;
    use std::path::PathBuf;

    fn roots() -> (PathBuf, PathBuf) {
        (PathBuf::from("/content"), PathBuf::from("/output"))
    }

    fn format(event: BuildEvent) -> Vec<String> {
        let (content, output) = roots();
        format_build_event(&event, &content, &output)
    }

    fn doc(rel: &str) -> Document {
        Document::from_path(Path::new("/content"), &Path::new("/content").join(rel)).unwrap()
    }

    fn template(name: &str) -> ResolvedTemplate {
        ResolvedTemplate {
            path: PathBuf::from("/templates").join(name),
            source: TemplateSource::Default,
        }
    }

    #[test]
    fn rendered_post_line() {
        let lines = format(BuildEvent::DocumentRendered {
            source: PathBuf::from("/content/blog/post1.md"),
            output: PathBuf::from("/output/blog/post1.html"),
            template: PathBuf::from("/templates/blog.html"),
            indexed: true,
        });
        assert_eq!(
            lines,
            vec!["rendered blog/post1.md → blog/post1.html (blog.html) [post]"]
        );
    }

    #[test]
    fn rendered_page_has_no_post_marker() {
        let lines = format(BuildEvent::DocumentRendered {
            source: PathBuf::from("/content/about.md"),
            output: PathBuf::from("/output/about.html"),
            template: PathBuf::from("/templates/default.html"),
            indexed: false,
        });
        assert_eq!(lines, vec!["rendered about.md → about.html (default.html)"]);
    }

    #[test]
    fn skipped_line_shows_status() {
        let lines = format(BuildEvent::DocumentSkipped {
            source: PathBuf::from("/content/blog/draft.md"),
            status: Some("draft".to_string()),
        });
        assert_eq!(lines, vec!["skipped  blog/draft.md (status: draft)"]);

        let lines = format(BuildEvent::DocumentSkipped {
            source: PathBuf::from("/content/x.md"),
            status: None,
        });
        assert_eq!(lines, vec!["skipped  x.md (no status)"]);
    }

    #[test]
    fn failure_shows_cause_indented() {
        let lines = format(BuildEvent::DocumentFailed {
            source: PathBuf::from("/content/bad.md"),
            error: "boom".to_string(),
        });
        assert_eq!(lines, vec!["FAILED   bad.md", "    boom"]);
    }

    #[test]
    fn asset_lines() {
        assert_eq!(
            format(BuildEvent::AssetsCopied {
                destination: PathBuf::from("/output/static"),
                files: 1,
            }),
            vec!["Static: copied 1 file → /output/static"]
        );
        assert_eq!(
            format(BuildEvent::AssetsSkipped {
                source: PathBuf::from("/static"),
            }),
            vec!["Static: /static not found, skipping copy"]
        );
    }

    #[test]
    fn blog_index_line() {
        let lines = format(BuildEvent::BlogIndexWritten {
            path: PathBuf::from("/output/blog/schema.json"),
            posts: 2,
        });
        assert_eq!(lines, vec!["Blog index: 2 posts → /output/blog/schema.json"]);
    }

    #[test]
    fn report_summary_counts() {
        let report = BuildReport {
            assets: AssetOutcome::SourceMissing,
            documents: vec![
                DocumentReport {
                    document: doc("a.md"),
                    outcome: DocumentOutcome::Rendered {
                        output: PathBuf::from("/output/a.html"),
                        template: template("default.html"),
                        entry: None,
                    },
                },
                DocumentReport {
                    document: doc("b.md"),
                    outcome: DocumentOutcome::Skipped { status: None },
                },
                DocumentReport {
                    document: doc("c.md"),
                    outcome: DocumentOutcome::Skipped {
                        status: Some("draft".into()),
                    },
                },
            ],
            blog_index: None,
        };
        assert_eq!(
            format_report(&report),
            vec!["", "Rendered 1, skipped 2, failed 0"]
        );
    }

    #[test]
    fn plan_lines() {
        let plan = vec![
            PlannedDocument {
                document: doc("blog/post1.md"),
                template: template("blog.html"),
                action: PlannedAction::Publish { indexed: true },
            },
            PlannedDocument {
                document: doc("draft.md"),
                template: template("default.html"),
                action: PlannedAction::Skip {
                    status: Some("draft".into()),
                },
            },
            PlannedDocument {
                document: doc("broken.md"),
                template: template("default.html"),
                action: PlannedAction::Invalid(DocumentError::Read {
                    path: PathBuf::from("/content/broken.md"),
                    source: std::io::Error::other("denied"),
                }),
            },
        ];

        let lines = format_plan(&plan, Path::new("/content"));

        assert_eq!(
            lines,
            vec![
                "publish  blog/post1.md  (blog.html) [post]",
                "skip     draft.md  (status: draft)",
                "invalid  broken.md",
                "    failed to read /content/broken.md: denied",
                "",
                "3 documents found, 1 to publish",
            ]
        );
    }
}
