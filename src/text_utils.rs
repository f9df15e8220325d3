//! Small text predicates shared by pagination and part splitting.

/// Closing quote used by the typography of the source books.
const CLOSING_QUOTE: char = '\u{201D}';

/// Heuristic check for whether a wrapped line ends a sentence.
///
/// Blank lines count as sentence ends because they mark paragraph breaks,
/// which are always acceptable break points. Otherwise only the last
/// non-whitespace character is inspected.
pub fn is_sentence_end(line: &str) -> bool {
    match line.trim_end().chars().next_back() {
        None => true,
        Some(ch) => matches!(ch, '.' | '!' | '?' | '"' | '\'' | ')' | CLOSING_QUOTE),
    }
}

/// Width of a string in Unicode scalar values.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_end_sentences() {
        assert!(is_sentence_end(""));
        assert!(is_sentence_end("   \t"));
    }

    #[test]
    fn terminal_punctuation_ends_sentences() {
        for line in [
            "To koniec.",
            "Naprawdę!",
            "Czy tak?",
            "Powiedział \"tak\"",
            "it's 'quoted'",
            "(w nawiasie)",
            "„Cytat”",
            "Trailing space.   ",
        ] {
            assert!(is_sentence_end(line), "{line:?} should end a sentence");
        }
    }

    #[test]
    fn mid_sentence_lines_do_not_end_sentences() {
        for line in ["i poszedł", "przecinek,", "dwukropek:", "myślnik —", "„otwarcie"] {
            assert!(!is_sentence_end(line), "{line:?} should not end a sentence");
        }
    }

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("żółć"), 4);
        assert_eq!(char_len(""), 0);
    }
}
