//! Batch pagination of every chapter under the books directory.

use crate::chapter::{ChapterError, ChapterReport, process_chapter_file};
use crate::config::AppConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub chapters: Vec<ChapterReport>,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn page_count(&self) -> usize {
        self.chapters.iter().map(|report| report.page_count).sum()
    }
}

/// Paginate every `.txt` file found (recursively) under `books_dir`.
///
/// A failing chapter is logged and recorded; the rest of the batch still runs.
pub fn process_all_books(books_dir: &Path, config: &AppConfig) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    if !books_dir.exists() {
        warn!(path = %books_dir.display(), "Books directory does not exist; nothing to do");
        return Ok(summary);
    }

    for chapter_path in collect_chapter_files(books_dir)? {
        match process_chapter_file(&chapter_path, config) {
            Ok(report) => summary.chapters.push(report),
            Err(err @ ChapterError::NotFound(_)) => {
                warn!(path = %chapter_path.display(), "Chapter vanished during batch: {err}");
                summary.failures.push((chapter_path, err.to_string()));
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                warn!(path = %chapter_path.display(), "Failed to paginate chapter: {err:#}");
                summary.failures.push((chapter_path, format!("{err:#}")));
            }
        }
    }

    if config.write_index_json {
        write_book_indexes(&config.extracts_dir(), &summary.chapters)?;
    }

    info!(
        chapters = summary.chapters.len(),
        pages = summary.page_count(),
        failures = summary.failures.len(),
        "Finished batch pagination"
    );
    Ok(summary)
}

/// All `.txt` files below `root`, sorted by path.
fn collect_chapter_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries =
            fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read entry in {}", dir.display()))?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if is_text_file(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

fn is_text_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "txt"
    )
}

#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    chapter: &'a str,
    pages: usize,
    files: Vec<String>,
}

fn write_book_indexes(extracts_dir: &Path, reports: &[ChapterReport]) -> Result<()> {
    let mut books: BTreeMap<&str, Vec<IndexEntry<'_>>> = BTreeMap::new();
    for report in reports.iter().filter(|report| !report.outputs.is_empty()) {
        let files = report
            .outputs
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        books
            .entry(report.book_title.as_str())
            .or_default()
            .push(IndexEntry {
                chapter: &report.chapter_base,
                pages: report.page_count,
                files,
            });
    }

    for (book_title, chapters) in books {
        let path = extracts_dir.join(book_title).join("index.json");
        let body = serde_json::json!({
            "book": book_title,
            "chapters": chapters,
        });
        fs::write(&path, serde_json::to_string_pretty(&body)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
