//! Splitting a paginated chapter into output parts.
//!
//! Chapters longer than `max_pages_per_file` are cut into parts of roughly
//! equal page count. Every boundary but the last is pushed forward until the
//! page before it ends a sentence, so no part starts mid-sentence.

use crate::pagination::Page;
use std::ops::Range;
use tracing::debug;

/// A contiguous run of pages written to one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// 1-based position among the emitted parts.
    pub number: usize,
    /// Chapter-wide page indices covered by this part.
    pub pages: Range<usize>,
}

impl Part {
    /// 1-based chapter-wide number of the first page in the part.
    pub fn first_page_number(&self) -> usize {
        self.pages.start + 1
    }
}

/// Partition `pages` into parts. An empty chapter has no parts.
pub fn split_into_parts(pages: &[Page], max_pages_per_file: usize) -> Vec<Part> {
    let total = pages.len();
    if total == 0 {
        return Vec::new();
    }
    let max_pages_per_file = max_pages_per_file.max(1);
    if total <= max_pages_per_file {
        return vec![Part {
            number: 1,
            pages: 0..total,
        }];
    }

    let num_parts = total.div_ceil(max_pages_per_file);
    let pages_per_part = total.div_ceil(num_parts);

    let mut parts = Vec::with_capacity(num_parts);
    let mut start = 0usize;
    for part_index in 0..num_parts {
        if start >= total {
            break;
        }
        let ideal_end = ((part_index + 1) * pages_per_part).min(total);
        if ideal_end <= start {
            debug!(
                part = part_index + 1,
                "skipping part swallowed by the previous boundary"
            );
            continue;
        }

        let end = if part_index + 1 == num_parts {
            total
        } else {
            nudge_to_sentence_end(pages, ideal_end)
        };
        if end != ideal_end {
            debug!(ideal_end, end, "moved part boundary to a sentence end");
        }

        parts.push(Part {
            number: parts.len() + 1,
            pages: start..end,
        });
        start = end;
    }

    parts
}

/// First boundary at or after `ideal_end` whose preceding page ends a
/// sentence, or the chapter end if there is none.
fn nudge_to_sentence_end(pages: &[Page], ideal_end: usize) -> usize {
    let total = pages.len();
    if ideal_end >= total || pages[ideal_end - 1].ends_sentence() {
        return ideal_end;
    }
    (ideal_end..total)
        .find(|&idx| pages[idx].ends_sentence())
        .map_or(total, |idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(last: &str) -> Page {
        Page {
            lines: vec!["początek strony".to_string(), last.to_string()],
        }
    }

    fn closed(count: usize) -> Vec<Page> {
        (0..count).map(|_| page("koniec.")).collect()
    }

    fn ranges(parts: &[Part]) -> Vec<Range<usize>> {
        parts.iter().map(|part| part.pages.clone()).collect()
    }

    fn assert_partition(parts: &[Part], total: usize) {
        let mut expected_start = 0;
        for (idx, part) in parts.iter().enumerate() {
            assert_eq!(part.number, idx + 1);
            assert_eq!(part.pages.start, expected_start);
            assert!(part.pages.end > part.pages.start);
            expected_start = part.pages.end;
        }
        assert_eq!(expected_start, total);
    }

    #[test]
    fn empty_chapter_has_no_parts() {
        assert!(split_into_parts(&[], 10).is_empty());
    }

    #[test]
    fn small_chapter_is_a_single_part() {
        let pages = closed(10);
        let parts = split_into_parts(&pages, 10);
        assert_eq!(ranges(&parts), vec![0..10]);
        assert_eq!(parts[0].first_page_number(), 1);
    }

    #[test]
    fn resplitting_single_part_is_stable() {
        let pages = closed(7);
        let once = split_into_parts(&pages, 10);
        let again = split_into_parts(&pages[once[0].pages.clone()], 10);
        assert_eq!(once, again);
    }

    #[test]
    fn even_split_on_sentence_ends() {
        let pages = closed(25);
        let parts = split_into_parts(&pages, 10);
        // 3 parts of ceil(25 / 3) = 9 pages.
        assert_eq!(ranges(&parts), vec![0..9, 9..18, 18..25]);
        assert_eq!(parts[1].first_page_number(), 10);
    }

    #[test]
    fn boundary_moves_forward_to_sentence_end() {
        let mut pages = closed(22);
        // Ideal ends are 8 and 16; pages 7 and 8 stop mid-sentence.
        pages[7] = page("i wtedy");
        pages[8] = page("a potem");
        let parts = split_into_parts(&pages, 10);
        assert_eq!(ranges(&parts), vec![0..10, 10..16, 16..22]);
        assert_partition(&parts, 22);
    }

    #[test]
    fn boundary_runs_to_chapter_end_without_sentence_end() {
        let pages: Vec<Page> = (0..12).map(|_| page("bez kropki")).collect();
        let parts = split_into_parts(&pages, 10);
        assert_eq!(ranges(&parts), vec![0..12]);
    }

    #[test]
    fn overshooting_boundary_swallows_following_part() {
        let mut pages: Vec<Page> = (0..30).map(|_| page("bez kropki")).collect();
        // Ideal ends 10 and 20; the first sentence end is on page 24.
        pages[24] = page("wreszcie.");
        let parts = split_into_parts(&pages, 10);
        assert_eq!(ranges(&parts), vec![0..25, 25..30]);
        assert_eq!(parts[1].number, 2);
    }

    #[test]
    fn parts_partition_all_pages() {
        for total in 1..60 {
            let pages: Vec<Page> = (0..total)
                .map(|idx| if idx % 4 == 0 { page("koniec.") } else { page("dalej") })
                .collect();
            let parts = split_into_parts(&pages, 10);
            assert_partition(&parts, total);
        }
    }
}
