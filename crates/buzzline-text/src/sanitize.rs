//! Scrubbing of user-supplied text.

/// Maximum length (in characters) of any user-supplied text after cleaning.
const MAX_CONTENT_CHARS: usize = 280;

/// Cleans user-supplied content before it is stored or broadcast.
///
/// - strips control characters,
/// - collapses runs of whitespace into single spaces,
/// - trims leading/trailing whitespace,
/// - caps the result at [`MAX_CONTENT_CHARS`] characters.
///
/// Returns an empty string when nothing survives, which callers treat as
/// "no content".
pub fn clean_content(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_CONTENT_CHARS));
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch.is_control() {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if out.chars().count() >= MAX_CONTENT_CHARS {
            break;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_content_trims_and_collapses_whitespace() {
        assert_eq!(clean_content("  hello   world  "), "hello world");
        assert_eq!(clean_content("a\t\nb"), "a b");
    }

    #[test]
    fn test_clean_content_strips_control_characters() {
        assert_eq!(clean_content("he\x00ll\x07o"), "hello");
    }

    #[test]
    fn test_clean_content_whitespace_only_becomes_empty() {
        assert_eq!(clean_content("   \t\n  "), "");
        assert_eq!(clean_content(""), "");
    }

    #[test]
    fn test_clean_content_caps_length() {
        let long = "x".repeat(1000);
        assert_eq!(clean_content(&long).chars().count(), 280);
    }

    #[test]
    fn test_clean_content_preserves_unicode() {
        assert_eq!(clean_content("café  ☕"), "café ☕");
    }
}
