//! Message text normalization applied before vectorization

use regex::Regex;
use std::sync::OnceLock;

fn non_letter_regex() -> &'static Regex {
    static NON_LETTER: OnceLock<Regex> = OnceLock::new();
    NON_LETTER.get_or_init(|| Regex::new(r"[^a-zA-Z]").expect("static pattern compiles"))
}

/// Lower-cases `text`, turns every character outside `[a-zA-Z]` into a
/// separator and joins the remaining tokens with single spaces.
///
/// The output only ever contains lowercase ASCII letters and single spaces,
/// and normalizing it again returns it unchanged.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced = non_letter_regex().replace_all(&lowered, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_normal_form(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_lowercase() || c == ' ')
            && !s.starts_with(' ')
            && !s.ends_with(' ')
            && !s.contains("  ")
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
        assert_eq!(normalize("1234 !!! ---"), "");
    }

    #[test]
    fn test_punctuation_and_case() {
        assert_eq!(normalize("FREE!!! WIN cash NOW"), "free win cash now");
    }

    #[test]
    fn test_digits_become_separators() {
        assert_eq!(normalize("Call 999-1234 now"), "call now");
        assert_eq!(normalize("txt4free"), "txt free");
    }

    #[test]
    fn test_non_ascii_letters_are_separators() {
        assert_eq!(normalize("café olé"), "caf ol");
        assert_eq!(normalize("Привет friend"), "friend");
        assert_eq!(normalize("naïve"), "na ve");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(normalize("  hello\t\tthere \r\n friend  "), "hello there friend");
    }

    #[test]
    fn test_output_alphabet_and_idempotence() {
        let samples = [
            "",
            "Hello, World!",
            "URGENT: You've WON £1000!!! Call 0800-123-456",
            "ok lar... joking wif u oni...",
            "Ünïcödé ß ǅ İstanbul K",
            "tab\tseparated\nlines\r\n",
            "a b  c   d",
            "🙂 emoji 🚀 rocket",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert!(is_normal_form(&once), "{sample:?} -> {once:?}");
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
