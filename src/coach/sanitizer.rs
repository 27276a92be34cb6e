//! Line clean-up and content filtering.

use std::collections::VecDeque;

/// Longest line the coach will speak, in whitespace-delimited words.
pub const MAX_WORDS: usize = 12;

/// Case-insensitive substrings that mark a generated line as unsafe to speak.
static BANNED_TERMS: &[&str] = &[
    "suicide",
    "self-harm",
    "self harm",
    "kill yourself",
    "hurt yourself",
    "overdose",
    "starve",
    "purging",
    "anorexi",
    "bulimi",
    "diagnos",
    "medication",
    "prescription",
    "steroid",
];

/// Collapse whitespace, trim, and keep at most [`MAX_WORDS`] words.
///
/// ```
/// use workout_coach::coach::sanitizer::sanitize;
///
/// assert_eq!(sanitize("  keep \n going   strong "), "keep going strong");
/// assert_eq!(sanitize("   "), "");
/// ```
pub fn sanitize(text: &str) -> String {
    text.split_whitespace()
        .take(MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `true` when `text` contains any denylisted term.
pub fn is_banned(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BANNED_TERMS.iter().any(|term| lowered.contains(term))
}

/// Case-insensitive membership in the recent-lines ring.
pub fn is_repeat(line: &str, recent: &VecDeque<String>) -> bool {
    let lowered = line.to_lowercase();
    recent.iter().any(|seen| seen.to_lowercase() == lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_twelve_words() {
        let out = sanitize("  a  b   c  d e f g h i j k l m  ");
        assert_eq!(out, "a b c d e f g h i j k l");
    }

    #[test]
    fn short_line_only_collapsed() {
        assert_eq!(sanitize("\tPush\t\tharder!\n"), "Push harder!");
    }

    #[test]
    fn blank_stays_blank() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \n\t "), "");
    }

    #[test]
    fn banned_is_case_insensitive() {
        assert!(is_banned("Ask about your MEDICATION first"));
        assert!(is_banned("don't starve yourself"));
        assert!(!is_banned("Strong legs, strong lungs"));
    }

    #[test]
    fn repeat_ignores_case() {
        let recent: VecDeque<String> = ["Keep going!".to_string()].into_iter().collect();
        assert!(is_repeat("keep GOING!", &recent));
        assert!(!is_repeat("Keep going", &recent));
    }
}
