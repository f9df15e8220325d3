//! Greedy line wrapping for chapter text.
//!
//! Every source line is a paragraph. Paragraphs are packed into lines of at
//! most `max_line_width` characters, and a run of very short words (one or two
//! letter prepositions and conjunctions) is never left dangling at the end of
//! a wrapped line: it is carried over to start the next one instead.

use crate::text_utils::char_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapOptions {
    /// Soft cap on line width, in characters.
    pub max_line_width: usize,
    /// Words this long or shorter are candidates for carry-back.
    pub short_word_max_len: usize,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            max_line_width: 60,
            short_word_max_len: 2,
        }
    }
}

/// Reflow `full_text` into display lines.
///
/// Blank paragraphs become exactly one empty line. A single word longer than
/// the width is placed alone on its line without being split.
pub fn wrap_text(full_text: &str, options: WrapOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in full_text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        wrap_paragraph(paragraph, options, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, options: WrapOptions, out: &mut Vec<String>) {
    let words: Vec<&str> = paragraph.split_whitespace().collect();
    let widths: Vec<usize> = words.iter().map(|word| char_len(word)).collect();
    let is_short = |idx: usize| widths[idx] <= options.short_word_max_len;
    let max = options.max_line_width;

    // The line being built is always `words[line_start..cursor]`.
    let mut line_start = 0usize;
    let mut line_width = 0usize;
    let mut cursor = 0usize;

    while cursor < words.len() {
        let proposed = if cursor == line_start {
            widths[cursor]
        } else {
            line_width + 1 + widths[cursor]
        };

        if proposed > max {
            if cursor > line_start {
                out.push(words[line_start..cursor].join(" "));
                line_start = cursor;
            }
            line_width = widths[cursor];
            cursor += 1;
            continue;
        }

        let next_overflows = widths
            .get(cursor + 1)
            .is_some_and(|next| proposed + 1 + next > max);
        if next_overflows && is_short(cursor) {
            let mut carry_from = cursor;
            while carry_from > line_start && is_short(carry_from - 1) {
                carry_from -= 1;
            }
            // Only carry when something longer stays behind; a line made
            // entirely of short words is kept as is.
            if carry_from > line_start {
                out.push(words[line_start..carry_from].join(" "));
                line_start = carry_from;
                line_width = 0;
                cursor = carry_from;
                continue;
            }
        }

        line_width = proposed;
        cursor += 1;
    }

    if line_start < words.len() {
        out.push(words[line_start..].join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(width: usize) -> WrapOptions {
        WrapOptions {
            max_line_width: width,
            short_word_max_len: 2,
        }
    }

    const SAMPLE: &str = "Alicja siedziała w fotelu i patrzyła na lustro, w którym \
odbijał się cały pokój. Za szybą coś się poruszyło, a kot z na pół \
przymkniętymi oczami udawał, że o niczym nie wie.\n\
\n\
Po chwili wstała i podeszła bliżej, bo w szkle zobaczyła drzwi, których \
przedtem tam nie było. Nie wiedziała, czy to sen, czy jawa.";

    fn words_of(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn keeps_every_word_in_order() {
        for width in [10, 25, 40, 60, 80] {
            let lines = wrap_text(SAMPLE, opts(width));
            let rejoined: Vec<String> = lines.iter().flat_map(|line| words_of(line)).collect();
            assert_eq!(rejoined, words_of(SAMPLE), "width {width}");
        }
    }

    #[test]
    fn multi_word_lines_respect_width() {
        for width in [10, 25, 40, 60] {
            for line in wrap_text(SAMPLE, opts(width)) {
                if line.split_whitespace().count() > 1 {
                    assert!(
                        char_len(&line) <= width,
                        "{line:?} is wider than {width}"
                    );
                }
            }
        }
    }

    #[test]
    fn blank_paragraph_becomes_single_empty_line() {
        let lines = wrap_text("Pierwszy.\n   \nDrugi.", opts(60));
        assert_eq!(lines, vec!["Pierwszy.", "", "Drugi."]);
    }

    #[test]
    fn short_run_carried_to_next_line() {
        // "Hello world i a" fits in 15, but "dog" would overflow right after "a".
        let lines = wrap_text("Hello world i a dog", opts(15));
        assert_eq!(lines, vec!["Hello world", "i a dog"]);
    }

    #[test]
    fn short_run_alone_on_line_stays_together() {
        let lines = wrap_text("a b verylongwordthatoverflows", opts(10));
        assert_eq!(lines, vec!["a b", "verylongwordthatoverflows"]);
    }

    #[test]
    fn short_word_followed_by_fitting_word_is_not_carried() {
        let lines = wrap_text("kot i pies", opts(10));
        assert_eq!(lines, vec!["kot i pies"]);
    }

    #[test]
    fn overlong_word_sits_alone_without_blank_line() {
        let lines = wrap_text("Konstantynopolitańczykowianeczka była tu", opts(12));
        assert_eq!(
            lines,
            vec!["Konstantynopolitańczykowianeczka", "była tu"]
        );
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        // Ten letters each, many of them two bytes in UTF-8.
        let lines = wrap_text("źdźbłożółć źdźbłożółć", opts(21));
        assert_eq!(lines, vec!["źdźbłożółć źdźbłożółć"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(wrap_text("", opts(60)).is_empty());
    }
}
