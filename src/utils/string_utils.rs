//! UTF-8-safe string helpers
//!
//! Text pulled out of arbitrary pages routinely contains multi-byte
//! characters, so every cut here happens on character boundaries.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use adaptive_scrape::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Collapse every run of whitespace into a single space and trim the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `count` words of `text`, with `...` appended when words were dropped.
///
/// Returns an empty string for blank input.
#[must_use]
pub fn first_words(text: &str, count: usize) -> String {
    let mut words = text.split_whitespace();
    let taken: Vec<&str> = words.by_ref().take(count).collect();
    let mut label = taken.join(" ");
    if !label.is_empty() && words.next().is_some() {
        label.push_str("...");
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(safe_truncate_chars("héllo", 2), "hé");
        assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
        assert_eq!(safe_truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn first_words_marks_truncation() {
        assert_eq!(first_words("one two three", 7), "one two three");
        assert_eq!(
            first_words("a b c d e f g h i", 7),
            "a b c d e f g..."
        );
        assert_eq!(first_words("a b c d e f g", 7), "a b c d e f g");
        assert_eq!(first_words("", 7), "");
    }
}
