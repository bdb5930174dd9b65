//! Placeholder substitution.
//!
//! Templates reference values with `$key$` tokens. Substitution runs in three
//! fixed steps:
//!
//! 1. every front matter key replaces all occurrences of its token, in
//!    mapping order (lists are joined with `", "`)
//! 2. the [`RESERVED_KEYS`] tokens still present are removed
//! 3. `$body$` is replaced with the converted HTML
//!
//! The body always wins: a front matter key named `body` is not substituted
//! in step 1, so `$body$` survives until step 3. Placeholder-like text inside
//! the body is never substituted because nothing runs after step 3.

use crate::frontmatter::FrontMatter;

/// Keys whose tokens never reach the output, even when a document omits them.
pub const RESERVED_KEYS: [&str; 4] = ["title", "date", "tags", "status"];

/// Token replaced by the converted document body.
pub const BODY_PLACEHOLDER: &str = "$body$";

const BODY_KEY: &str = "body";

fn token(key: &str) -> String {
    format!("${key}$")
}

/// Replace front matter tokens, then strip unresolved reserved tokens.
pub fn replace_placeholders(template: &str, front_matter: &FrontMatter) -> String {
    let mut text = template.to_string();
    for (key, value) in front_matter.iter() {
        if key == BODY_KEY {
            continue;
        }
        let placeholder = token(key);
        if text.contains(&placeholder) {
            text = text.replace(&placeholder, &value.render());
        }
    }
    strip_reserved(&text)
}

/// Remove any remaining reserved tokens.
pub fn strip_reserved(template: &str) -> String {
    RESERVED_KEYS
        .iter()
        .fold(template.to_string(), |text, key| text.replace(&token(key), ""))
}

/// Insert the converted body.
pub fn insert_body(template: &str, body_html: &str) -> String {
    template.replace(BODY_PLACEHOLDER, body_html)
}

/// Run all substitution steps on an expanded template.
pub fn render(template: &str, front_matter: &FrontMatter, body_html: &str) -> String {
    insert_body(&replace_placeholders(template, front_matter), body_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::MetaValue;

    fn fm(pairs: &[(&str, MetaValue)]) -> FrontMatter {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn scalar_replaces_every_occurrence() {
        let out = replace_placeholders(
            "<title>$title$</title><h1>$title$</h1>",
            &fm(&[("title", MetaValue::scalar("Hi"))]),
        );
        assert_eq!(out, "<title>Hi</title><h1>Hi</h1>");
    }

    #[test]
    fn list_joined_with_comma_space() {
        let out = replace_placeholders(
            "tags: $tags$",
            &fm(&[(
                "tags",
                MetaValue::List(vec!["a".into(), "b".into(), "c".into()]),
            )]),
        );
        assert_eq!(out, "tags: a, b, c");
    }

    #[test]
    fn unmatched_reserved_tokens_removed() {
        let out = replace_placeholders("$title$ $date$ $tags$ $status$", &FrontMatter::new());
        assert_eq!(out, "   ");
    }

    #[test]
    fn unmatched_reserved_tokens_removed_other_text_unchanged() {
        let template = "<p>[$title$] by $author$ on $date$ {$tags$} ($status$) $5</p>";
        let out = replace_placeholders(template, &fm(&[("unused", MetaValue::scalar("x"))]));
        assert_eq!(out, "<p>[] by $author$ on  {} () $5</p>");
    }

    #[test]
    fn custom_keys_substituted() {
        let out = replace_placeholders(
            "$site_name$ | $author$",
            &fm(&[
                ("site_name", MetaValue::scalar("Notebook")),
                ("author", MetaValue::scalar("Ann")),
            ]),
        );
        assert_eq!(out, "Notebook | Ann");
    }

    #[test]
    fn body_inserted_last() {
        let out = render(
            "<html>$title$ $body$</html>",
            &fm(&[("title", MetaValue::scalar("Hello World"))]),
            "<h1>Hi</h1>",
        );
        assert_eq!(out, "<html>Hello World <h1>Hi</h1></html>");
    }

    #[test]
    fn front_matter_body_key_overwritten_by_body() {
        let out = render(
            "$body$",
            &fm(&[("body", MetaValue::scalar("from front matter"))]),
            "<p>converted</p>",
        );
        assert_eq!(out, "<p>converted</p>");
    }

    #[test]
    fn body_text_is_not_substituted() {
        let out = render(
            "$title$: $body$",
            &fm(&[("title", MetaValue::scalar("T"))]),
            "<code>$title$</code>",
        );
        assert_eq!(out, "T: <code>$title$</code>");
    }

    #[test]
    fn empty_scalar_clears_token() {
        let out = replace_placeholders("[$subtitle$]", &fm(&[("subtitle", MetaValue::scalar(""))]));
        assert_eq!(out, "[]");
    }

    #[test]
    fn substitution_follows_mapping_order() {
        // "a" expands to a token for "b", which is substituted afterwards
        let out = replace_placeholders(
            "$a$",
            &fm(&[
                ("a", MetaValue::scalar("$b$")),
                ("b", MetaValue::scalar("B")),
            ]),
        );
        assert_eq!(out, "B");
    }
}
