//! The page-delimited extract format shared with the riddle generators.
//!
//! Each page is introduced by a `| Page <n> |` marker line surrounded by
//! blank lines. Page numbers are 1-based and run across all parts of a
//! chapter.

use crate::pagination::Page;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

static RE_PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\| Page (\d+) \|$").expect("page marker regex is valid"));

pub fn page_marker(page_number: usize) -> String {
    format!("| Page {page_number} |")
}

/// Render pages as extract text, numbering them from `first_page_number`.
pub fn render_part(pages: &[Page], first_page_number: usize) -> String {
    let mut out = String::new();
    for (offset, page) in pages.iter().enumerate() {
        out.push('\n');
        out.push_str(&page_marker(first_page_number + offset));
        out.push_str("\n\n");
        for line in &page.lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

/// Write pages to `output_path`, creating the parent directory if needed.
///
/// The text goes to a sibling `.tmp` file first and is renamed into place,
/// so a reader never sees a half-written extract under the final name.
pub fn write_part(pages: &[Page], first_page_number: usize, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output dir {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(output_path);
    fs::write(&tmp_path, render_part(pages, first_page_number))
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, output_path).with_context(|| {
        format!(
            "Failed to move {} into place at {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;

    debug!(
        path = %output_path.display(),
        pages = pages.len(),
        first_page = first_page_number,
        "Wrote extract"
    );
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Output file name for one part of a chapter.
pub fn part_file_name(chapter_base: &str, part_number: usize, part_count: usize) -> String {
    if part_count > 1 {
        format!("{chapter_base}_part_{part_number}.txt")
    } else {
        format!("{chapter_base}.txt")
    }
}

/// Delete extracts of `chapter_base` in `output_dir` that are not in `keep`.
///
/// Matches both `<base>.txt` and `<base>_part_<k>.txt`, so a chapter that
/// shrank since the last run leaves no old parts behind. Returns the removed
/// paths; a missing directory removes nothing.
pub fn remove_stale_parts(
    output_dir: &Path,
    chapter_base: &str,
    keep: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!(r"^{}(_part_\d+)?\.txt$", regex::escape(chapter_base));
    let re = Regex::new(&pattern)
        .with_context(|| format!("Failed to build extract name pattern for {chapter_base}"))?;

    let entries = fs::read_dir(output_dir)
        .with_context(|| format!("Failed to list {}", output_dir.display()))?;
    let mut removed = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", output_dir.display()))?
            .path();
        let is_part = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| re.is_match(name));
        if !is_part || keep.contains(&path) {
            continue;
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stale extract {}", path.display()))?;
        debug!(path = %path.display(), "Removed stale extract");
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

/// Read one page back out of an extract file.
///
/// Returns `Ok(None)` when the file has no marker for `page_number`. The
/// blank lines directly around the marker are dropped; every returned line
/// keeps its trailing newline.
pub fn read_page(extract_path: &Path, page_number: usize) -> Result<Option<String>> {
    let file = fs::File::open(extract_path)
        .with_context(|| format!("Failed to open extract {}", extract_path.display()))?;
    let start_marker = page_marker(page_number);
    let next_marker = page_marker(page_number + 1);

    let mut found = false;
    let mut collected: Vec<String> = Vec::new();
    for line in BufReader::new(file).lines() {
        let line =
            line.with_context(|| format!("Failed to read extract {}", extract_path.display()))?;
        if !found {
            found = line.trim() == start_marker;
            continue;
        }
        if line.trim() == next_marker {
            break;
        }
        collected.push(line);
    }

    if !found {
        return Ok(None);
    }
    let inner = match collected.len() {
        0 | 1 => &collected[..0],
        len => &collected[1..len - 1],
    };
    let mut page = String::new();
    for line in inner {
        page.push_str(line);
        page.push('\n');
    }
    Ok(Some(page))
}

/// Page numbers of every marker present in extract text, in file order.
pub fn page_numbers(extract_text: &str) -> Vec<usize> {
    extract_text
        .lines()
        .filter_map(|line| RE_PAGE_MARKER.captures(line.trim()))
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}
