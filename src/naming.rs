//! Display names derived from document file names.
//!
//! A blog post without a `title` in its front matter is listed under a
//! headline built from its base name: dashes become spaces and every word is
//! capitalized.
//!
//! - `my-first-post` → "My First Post"
//! - `HELLO-world` → "Hello World"
//! - `v2-release` → "V2 Release"

/// Turn a file base name into a display headline.
///
/// A letter is uppercased when it follows a non-letter (or starts the string)
/// and lowercased otherwise, so `it's-done` becomes "It'S Done" the same way
/// classic title-casing does.
pub fn humanize(base_name: &str) -> String {
    let spaced = base_name.replace('-', " ");
    let mut result = String::with_capacity(spaced.len());
    let mut prev_is_letter = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }
    result
}
