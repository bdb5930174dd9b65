//! Partial template discovery and inlining.
//!
//! Every `.html` file in the template directory is a potential partial,
//! except the one file named [`EXCLUDED_PARTIAL`]. A template that contains
//! `$header$` gets the raw text of `header.html` in its place.
//!
//! ## Single pass
//!
//! Partials are inlined in name order, each exactly once, and the result is
//! never re-scanned. Placeholders inside an inlined partial are left for the
//! substitution pass; a partial token inside a partial is only expanded if
//! that partial sorts later than the one that introduced it.
//!
//! ```text
//! templates/
//! ├── default.html   never a partial
//! ├── footer.html    $footer$
//! ├── header.html    $header$
//! └── post.html      $post$ (also a primary template)
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Template file name that is never inlined as a partial.
pub const EXCLUDED_PARTIAL: &str = "default.html";

const TEMPLATE_SUFFIX: &str = ".html";

/// A partial template available for inlining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    /// Template file name without `.html`.
    pub name: String,
    pub path: PathBuf,
}

impl Partial {
    /// The token that is replaced by this partial, e.g. `$header$`.
    pub fn placeholder(&self) -> String {
        format!("${}$", self.name)
    }
}

/// The partials found by one scan of the template directory, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    partials: Vec<Partial>,
}

impl TemplateRegistry {
    /// Scan `template_dir` for partials.
    pub fn scan(template_dir: &Path) -> io::Result<Self> {
        let mut partials: Vec<Partial> = fs::read_dir(template_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| {
                let file_name = e.file_name().into_string().ok()?;
                if file_name == EXCLUDED_PARTIAL {
                    return None;
                }
                let name = file_name.strip_suffix(TEMPLATE_SUFFIX)?.to_string();
                Some(Partial {
                    name,
                    path: e.path(),
                })
            })
            .collect();

        partials.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { partials })
    }

    pub fn names(&self) -> Vec<&str> {
        self.partials.iter().map(|p| p.name.as_str()).collect()
    }

    /// Inline every referenced partial into `template`, in one pass.
    ///
    /// A partial file is only read when its placeholder occurs in the text.
    pub fn expand(&self, template: &str) -> io::Result<String> {
        let mut text = template.to_string();
        for partial in &self.partials {
            let placeholder = partial.placeholder();
            if text.contains(&placeholder) {
                let content = fs::read_to_string(&partial.path)?;
                text = text.replace(&placeholder, &content);
            }
        }
        Ok(text)
    }
}

/// Scan the template directory and inline partials into `template`.
///
/// The directory is re-read on every call; nothing is cached between
/// documents.
pub fn expand_partials(template_dir: &Path, template: &str) -> io::Result<String> {
    TemplateRegistry::scan(template_dir)?.expand(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template_dir(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(name), content).unwrap();
        }
        tmp
    }

    #[test]
    fn registry_sorted_and_excludes_default() {
        let tmp = template_dir(&[
            ("header.html", ""),
            ("default.html", ""),
            ("footer.html", ""),
            ("notes.txt", ""),
        ]);
        let registry = TemplateRegistry::scan(tmp.path()).unwrap();
        assert_eq!(registry.names(), vec!["footer", "header"]);
    }

    #[test]
    fn registry_skips_directories() {
        let tmp = template_dir(&[("nav.html", "")]);
        fs::create_dir(tmp.path().join("layouts.html")).unwrap();
        let registry = TemplateRegistry::scan(tmp.path()).unwrap();
        assert_eq!(registry.names(), vec!["nav"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_partial_is_inlined() {
        let shared = template_dir(&[("header.html", "<header>shared</header>")]);
        let tmp = template_dir(&[("default.html", "")]);
        std::os::unix::fs::symlink(
            shared.path().join("header.html"),
            tmp.path().join("header.html"),
        )
        .unwrap();

        let registry = TemplateRegistry::scan(tmp.path()).unwrap();
        assert_eq!(registry.names(), vec!["header"]);
        let out = registry.expand("$header$ $body$").unwrap();
        assert_eq!(out, "<header>shared</header> $body$");
    }

    #[test]
    fn inlines_all_occurrences() {
        let tmp = template_dir(&[("sep.html", "<hr>")]);
        let out = expand_partials(tmp.path(), "a $sep$ b $sep$ c").unwrap();
        assert_eq!(out, "a <hr> b <hr> c");
    }

    #[test]
    fn partial_placeholders_left_for_substitution() {
        let tmp = template_dir(&[("header.html", "<h1>$title$</h1>")]);
        let out = expand_partials(tmp.path(), "<body>$header$ $body$</body>").unwrap();
        assert_eq!(out, "<body><h1>$title$</h1> $body$</body>");
    }

    #[test]
    fn default_is_never_inlined() {
        let tmp = template_dir(&[("default.html", "DEFAULT")]);
        let out = expand_partials(tmp.path(), "$default$").unwrap();
        assert_eq!(out, "$default$");
    }

    #[test]
    fn unreferenced_text_unchanged() {
        let tmp = template_dir(&[("header.html", "H")]);
        let out = expand_partials(tmp.path(), "<p>$title$ costs $5</p>").unwrap();
        assert_eq!(out, "<p>$title$ costs $5</p>");
    }

    #[test]
    fn single_pass_follows_name_order() {
        // "a" is expanded before "b": a token for "b" introduced by "a" is
        // still expanded, a token for "a" introduced by "b" is not.
        let tmp = template_dir(&[("a.html", "[A $b$]"), ("b.html", "[B $a$]")]);
        let out = expand_partials(tmp.path(), "$a$").unwrap();
        assert_eq!(out, "[A [B $a$]]");
    }

    #[test]
    fn primary_templates_are_partials_too() {
        let tmp = template_dir(&[("blog.html", "BLOG"), ("default.html", "")]);
        let out = expand_partials(tmp.path(), "x $blog$ y").unwrap();
        assert_eq!(out, "x BLOG y");
    }

    #[test]
    fn missing_template_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(expand_partials(&tmp.path().join("missing"), "t").is_err());
    }
}
