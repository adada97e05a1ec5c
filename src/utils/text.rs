// src/utils/text.rs

use std::sync::LazyLock;

use regex::Regex;

/// Anything at the edges of an answer that is not a letter, digit, `-`, `(` or `)`.
static ANSWER_EDGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{L}\p{N}\-()]+|[^\p{L}\p{N}\-()]+$").expect("answer edge pattern is valid")
});

/// Trims an answer and strips stray punctuation models tend to emit around it
/// ("**12**", "x = 4.", "`-3`"). Interior characters are kept untouched.
pub fn clean_answer(raw: &str) -> String {
    ANSWER_EDGES.replace_all(raw.trim(), "").into_owned()
}

/// Truncates `s` to `max_chars` characters, replacing the tail with "..." when it is cut.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_and_punctuation() {
        assert_eq!(clean_answer("  **12**  "), "12");
        assert_eq!(clean_answer("`-3`."), "-3");
        assert_eq!(clean_answer("(x+1)(x-1);"), "(x+1)(x-1)");
        assert_eq!(clean_answer("2π."), "2π");
    }

    #[test]
    fn only_dash_and_parentheses_survive_at_the_edges() {
        assert_eq!(clean_answer("√2!"), "2");
        assert_eq!(clean_answer("2√"), "2");
        assert_eq!(clean_answer("-(x)"), "-(x)");
        assert_eq!(clean_answer("3√2"), "3√2");
    }

    #[test]
    fn keeps_interior_characters() {
        assert_eq!(clean_answer("x = 4"), "x = 4");
        assert_eq!(clean_answer("3/4"), "3/4");
    }

    #[test]
    fn only_punctuation_becomes_empty() {
        assert_eq!(clean_answer(" ... "), "");
    }

    #[test]
    fn truncates_long_text() {
        let long = "a".repeat(200);
        let cut = truncate_with_ellipsis(&long, 150);
        assert_eq!(cut.chars().count(), 150);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..147], &long[..147]);
    }

    #[test]
    fn leaves_short_text_alone() {
        let exact = "b".repeat(150);
        assert_eq!(truncate_with_ellipsis(&exact, 150), exact);
    }

    #[test]
    fn truncation_is_char_based() {
        let s = "é".repeat(151);
        let cut = truncate_with_ellipsis(&s, 150);
        assert_eq!(cut.chars().count(), 150);
    }
}
