//! Pagination of wrapped lines.
//!
//! Pages aim for `preferred` lines and never exceed `max`. From the preferred
//! size the paginator looks forward for the first line that ends a sentence;
//! failing that it looks backward down to `min`, and only then cuts at the
//! hard ceiling. An undersized trailing page is merged into its predecessor
//! when that keeps the predecessor within `max`.

use crate::text_utils::is_sentence_end;
use tracing::{debug, trace};

/// Page size limits, in lines. Expected to satisfy `0 < min <= preferred <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub preferred: usize,
    pub max: usize,
    pub min: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            preferred: 15,
            max: 20,
            min: 5,
        }
    }
}

/// A group of wrapped lines displayed together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub lines: Vec<String>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Whether the page closes on a sentence boundary. An empty page counts
    /// as one, the same way a blank line does.
    pub fn ends_sentence(&self) -> bool {
        self.last_line().is_none_or(is_sentence_end)
    }
}

/// Split `lines` into pages. Zero lines yield zero pages.
pub fn paginate(lines: &[String], limits: PageLimits) -> Vec<Page> {
    let total = lines.len();
    let mut pages: Vec<Page> = Vec::new();
    let mut cursor = 0usize;

    while cursor < total {
        let break_at = find_break(lines, cursor, limits);
        trace!(start = cursor, end = break_at, "page break chosen");
        pages.push(Page {
            lines: lines[cursor..break_at].to_vec(),
        });
        cursor = break_at;
    }

    merge_short_tail(&mut pages, limits);
    debug!(lines = total, pages = pages.len(), "paginated chapter");
    pages
}

/// Exclusive end index of the page that starts at `start`.
fn find_break(lines: &[String], start: usize, limits: PageLimits) -> usize {
    let total = lines.len();
    if total - start < limits.preferred {
        return total;
    }

    let ends_at = |idx: usize| is_sentence_end(&lines[idx - 1]);
    let hard_max = (start + limits.max).min(total);
    let search_min = (start + limits.min).min(total);
    let search_start = search_min.max(start + limits.preferred).min(total);

    let mut best = hard_max;
    for candidate in search_start..=hard_max {
        if ends_at(candidate) || candidate == total {
            best = candidate;
            break;
        }
    }

    if !ends_at(best) {
        if let Some(candidate) = (search_min..search_start).rev().find(|&idx| ends_at(idx)) {
            best = candidate;
        }
    }

    if !ends_at(best) && best != total {
        best = hard_max;
    }
    best
}

fn merge_short_tail(pages: &mut Vec<Page>, limits: PageLimits) {
    let Some(last) = pages.last() else {
        return;
    };
    if last.len() >= limits.min || pages.len() < 2 {
        return;
    }

    let fits = pages[pages.len() - 2].len() + last.len() <= limits.max;
    if fits {
        if let Some(short) = pages.pop() {
            if let Some(previous) = pages.last_mut() {
                previous.lines.extend(short.lines);
            }
        }
    } else {
        debug!(
            lines = last.len(),
            "keeping short final page; merging would exceed the maximum"
        );
    }
}
