//! Front matter extraction and the ordered metadata mapping.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello World
//! status: published
//! tags: [intro, news]
//! date: 2024-01-01
//! ---
//! # Hi
//! ```
//!
//! The block closes at the next `---` (or `...`) line. Text without an opening
//! fence, or with an opening fence that never closes, has no front matter and
//! is all body.
//!
//! ## Values
//!
//! Templates only ever see text, so every YAML value is flattened into a
//! [`MetaValue`] when parsed:
//!
//! | YAML | MetaValue |
//! |------|-----------|
//! | string | `Scalar` as written |
//! | number, bool | `Scalar` in natural form (`3`, `true`) |
//! | null | empty `Scalar` |
//! | sequence | `List`, each element flattened to text |
//! | mapping | `Scalar` holding its JSON text |

use serde_yaml::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
}

/// A single front matter value: a string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        MetaValue::Scalar(value.into())
    }

    /// The scalar text, or `None` for lists.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            MetaValue::Scalar(s) => Some(s),
            MetaValue::List(_) => None,
        }
    }

    /// Text form used in templates: lists joined with `", "`.
    pub fn render(&self) -> String {
        match self {
            MetaValue::Scalar(s) => s.clone(),
            MetaValue::List(items) => items.join(", "),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Ordered mapping from key to [`MetaValue`].
///
/// Iteration follows insertion order, which for parsed documents is the order
/// keys appear in the YAML block. Re-inserting an existing key replaces the
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, MetaValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value of `key`, if present and not a list.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_scalar)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Supplement with `fallback` values for keys this mapping lacks.
    ///
    /// Existing keys are never overwritten. New keys are appended after the
    /// existing ones, in `fallback`'s order.
    pub fn merge_fallback(&mut self, fallback: &FrontMatter) {
        for (key, value) in fallback.iter() {
            if !self.contains_key(key) {
                self.entries.push((key.to_string(), value.clone()));
            }
        }
    }
}

impl FromIterator<(String, MetaValue)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        let mut fm = FrontMatter::new();
        for (key, value) in iter {
            fm.insert(key, value);
        }
        fm
    }
}

/// A document's text split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Split raw text into the YAML block (without fences) and the body.
///
/// Returns `None` for the block when the text has no closed front matter.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(first_end) = text.find('\n') else {
        return (None, text);
    };
    if text[..first_end].trim_end() != "---" {
        return (None, text);
    }

    let block_start = first_end + 1;
    let mut offset = block_start;
    for line in text[block_start..].split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return (Some(block), body);
        }
        offset += line.len();
    }

    (None, text)
}

/// Parse the front matter block of a document.
pub fn extract(text: &str) -> Result<FrontMatter, FrontMatterError> {
    parse(text).map(|doc| doc.front_matter)
}

/// Parse a document into front matter and body.
pub fn parse(text: &str) -> Result<ParsedDocument, FrontMatterError> {
    let (block, body) = split(text);
    let front_matter = match block {
        Some(yaml) => parse_block(yaml)?,
        None => FrontMatter::new(),
    };
    Ok(ParsedDocument {
        front_matter,
        body: body.to_string(),
    })
}

fn parse_block(yaml: &str) -> Result<FrontMatter, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(FrontMatter::new()),
        Value::Mapping(mapping) => Ok(mapping
            .iter()
            .map(|(key, value)| (flatten(key), meta_value(value)))
            .collect()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn meta_value(value: &Value) -> MetaValue {
    match value {
        Value::Sequence(items) => MetaValue::List(items.iter().map(flatten).collect()),
        Value::Tagged(tagged) => meta_value(&tagged.value),
        other => MetaValue::Scalar(flatten(other)),
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => flatten(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value)
            .or_else(|_| serde_yaml::to_string(value).map(|s| s.trim_end().to_string()))
            .unwrap_or_default(),
    }
}
