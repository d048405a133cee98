//! Answer judging.
//!
//! Canonical answers in the question bank can carry parenthetical hints,
//! e.g. `"(Wolfgang Amadeus) Mozart"`. A submission matches if it equals
//! the normalized canonical answer either with those hints included or
//! with them stripped.

/// Decides whether `submitted` is an acceptable match for `canonical`.
pub fn judge_answer(submitted: &str, canonical: &str) -> bool {
    let given = normalize(submitted);
    if given.is_empty() {
        return false;
    }

    if given == normalize(canonical) {
        return true;
    }

    // Retry with parenthetical hints removed from the canonical answer.
    let required = strip_parentheticals(canonical);
    !required.is_empty() && given == normalize(&required)
}

/// Lowercases, drops everything but letters/digits/spaces, collapses
/// whitespace, and strips a leading article (the/a/an).
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }

    for article in ["the ", "a ", "an "] {
        if let Some(rest) = out.strip_prefix(article) {
            return rest.to_string();
        }
    }
    out
}

/// Removes `(...)` spans from an answer line.
fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth: u32 = 0;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_answer_exact_match() {
        assert!(judge_answer("Paris", "Paris"));
    }

    #[test]
    fn test_judge_answer_case_and_punctuation_insensitive() {
        assert!(judge_answer("  paris! ", "Paris"));
        assert!(judge_answer("JOHN F. KENNEDY", "John F Kennedy"));
    }

    #[test]
    fn test_judge_answer_ignores_leading_article() {
        assert!(judge_answer("The Great Gatsby", "Great Gatsby"));
        assert!(judge_answer("Great Gatsby", "The Great Gatsby"));
        assert!(judge_answer("an apple", "Apple"));
    }

    #[test]
    fn test_judge_answer_matches_without_parenthetical_hint() {
        assert!(judge_answer("Mozart", "(Wolfgang Amadeus) Mozart"));
        assert!(judge_answer("Wolfgang Amadeus Mozart", "(Wolfgang Amadeus) Mozart"));
    }

    #[test]
    fn test_judge_answer_rejects_wrong_answer() {
        assert!(!judge_answer("London", "Paris"));
        assert!(!judge_answer("Mozar", "(Wolfgang Amadeus) Mozart"));
    }

    #[test]
    fn test_judge_answer_empty_submission_never_matches() {
        assert!(!judge_answer("", "Paris"));
        assert!(!judge_answer("  !? ", "Paris"));
    }

    #[test]
    fn test_normalize_collapses_internal_separators() {
        assert_eq!(normalize("jean-paul  sartre"), "jean paul sartre");
    }
}
