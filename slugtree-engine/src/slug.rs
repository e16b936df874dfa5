//! Title to slug conversion.

use deunicode::deunicode;

/// Converts free text into a URL segment.
///
/// Unicode is transliterated to ASCII, letters are lowercased, and every run
/// of other characters becomes a single `-`. Leading and trailing dashes are
/// dropped, so the result may be empty.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut last_was_dash = true; // no leading dash

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_title() {
        assert_eq!(slugify("My Great Post"), "my-great-post");
    }

    #[test]
    fn punctuation_collapses() {
        assert_eq!(slugify("C++ & Rust: a primer!"), "c-rust-a-primer");
    }

    #[test]
    fn transliterates_unicode() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify("Über uns"), "uber-uns");
    }

    #[test]
    fn symbols_only_is_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn existing_slug_is_unchanged() {
        assert_eq!(slugify("launch-2"), "launch-2");
    }
}
