//! One chapter file end to end: read, wrap, paginate, split, write.

use crate::config::AppConfig;
use crate::extract_file::{part_file_name, remove_stale_parts, write_part};
use crate::line_wrap::wrap_text;
use crate::pagination::{Page, paginate};
use crate::parts::{Part, split_into_parts};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("chapter file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read chapter {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write extract {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Outcome of paginating one chapter file.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterReport {
    pub chapter: PathBuf,
    pub book_title: String,
    pub chapter_base: String,
    pub line_count: usize,
    pub page_count: usize,
    pub outputs: Vec<PathBuf>,
}

/// A chapter laid out in memory, ready to be written.
#[derive(Debug, Clone, Default)]
pub struct Chapter {
    pub lines: Vec<String>,
    pub pages: Vec<Page>,
    pub parts: Vec<Part>,
}

impl Chapter {
    /// Lay out raw chapter text with the configured wrap and page limits.
    /// Text with nothing but whitespace lays out to no pages at all.
    pub fn layout(raw_text: &str, config: &AppConfig) -> Self {
        if raw_text.trim().is_empty() {
            return Chapter::default();
        }
        let text: String = raw_text.nfc().collect();
        let lines = wrap_text(&text, config.wrap_options());
        let pages = paginate(&lines, config.page_limits());
        let parts = split_into_parts(&pages, config.max_pages_per_file);
        Chapter {
            lines,
            pages,
            parts,
        }
    }

    pub fn part_pages(&self, part: &Part) -> &[Page] {
        &self.pages[part.pages.clone()]
    }
}

/// Paginate `chapter_path` into `<extracts_dir>/<book title>/`, where the
/// book title is the name of the chapter's parent directory.
pub fn process_chapter_file(
    chapter_path: &Path,
    config: &AppConfig,
) -> Result<ChapterReport, ChapterError> {
    let raw_text = match fs::read_to_string(chapter_path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ChapterError::NotFound(chapter_path.to_path_buf()));
        }
        Err(source) => {
            return Err(ChapterError::Read {
                path: chapter_path.to_path_buf(),
                source,
            });
        }
    };

    let book_title = file_name_lossy(chapter_path.parent());
    let chapter_base = chapter_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_dir = config.extracts_dir().join(&book_title);

    let chapter = Chapter::layout(&raw_text, config);
    debug!(
        path = %chapter_path.display(),
        lines = chapter.lines.len(),
        pages = chapter.pages.len(),
        parts = chapter.parts.len(),
        "Laid out chapter"
    );

    let mut outputs = Vec::with_capacity(chapter.parts.len());
    for part in &chapter.parts {
        let file_name = part_file_name(&chapter_base, part.number, chapter.parts.len());
        let output_path = output_dir.join(file_name);
        write_part(
            chapter.part_pages(part),
            part.first_page_number(),
            &output_path,
        )
        .map_err(|source| ChapterError::Write {
            path: output_path.clone(),
            source,
        })?;
        outputs.push(output_path);
    }

    let removed = remove_stale_parts(&output_dir, &chapter_base, &outputs).map_err(|source| {
        ChapterError::Write {
            path: output_dir.clone(),
            source,
        }
    })?;
    if !removed.is_empty() {
        debug!(
            path = %chapter_path.display(),
            removed = removed.len(),
            "Removed extracts left over from an earlier layout"
        );
    }

    info!(
        path = %chapter_path.display(),
        pages = chapter.pages.len(),
        files = outputs.len(),
        "Paginated chapter"
    );

    Ok(ChapterReport {
        chapter: chapter_path.to_path_buf(),
        book_title,
        chapter_base,
        line_count: chapter.lines.len(),
        page_count: chapter.pages.len(),
        outputs,
    })
}

fn file_name_lossy(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_file::read_page;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("riddle_pager_test_{name}_{nanos}"))
    }

    fn config_for(root: &Path) -> AppConfig {
        AppConfig {
            extracts_dir: root.join("extracts").display().to_string(),
            ..AppConfig::default()
        }
    }

    fn long_chapter(paragraphs: usize) -> String {
        (0..paragraphs)
            .map(|idx| {
                format!(
                    "Akapit {idx}. Lustro wisiało nad kominkiem i odbijało cały \
pokój, razem z zegarem, który tykał bardzo głośno w ciszy popołudnia."
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn missing_chapter_reports_not_found_and_writes_nothing() {
        let root = unique_temp_dir("missing_chapter");
        let cfg = config_for(&root);
        let err = process_chapter_file(&root.join("Książka").join("brak.txt"), &cfg)
            .expect_err("missing file should fail");
        assert!(matches!(err, ChapterError::NotFound(_)));
        assert!(!root.join("extracts").exists());
    }

    #[test]
    fn blank_chapter_writes_no_files() {
        let root = unique_temp_dir("blank_chapter");
        let book_dir = root.join("Książka");
        fs::create_dir_all(&book_dir).expect("create book dir");
        let cfg = config_for(&root);
        for (name, text) in [("pusty.txt", ""), ("biały.txt", "\n   \n\t\n")] {
            let chapter_path = book_dir.join(name);
            fs::write(&chapter_path, text).expect("write chapter");

            let report = process_chapter_file(&chapter_path, &cfg).expect("process");
            assert_eq!(report.page_count, 0, "{name}");
            assert_eq!(report.line_count, 0, "{name}");
            assert!(report.outputs.is_empty(), "{name}");
        }
        assert!(!root.join("extracts").exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn whitespace_only_text_lays_out_to_nothing() {
        let chapter = Chapter::layout("\n   \n\t\n", &AppConfig::default());
        assert!(chapter.lines.is_empty());
        assert!(chapter.pages.is_empty());
        assert!(chapter.parts.is_empty());
    }

    #[test]
    fn shrunk_chapter_leaves_no_stale_parts() {
        let root = unique_temp_dir("shrunk_chapter");
        let book_dir = root.join("Książka");
        fs::create_dir_all(&book_dir).expect("create book dir");
        let chapter_path = book_dir.join("rozdzial.txt");
        let cfg = config_for(&root);
        let output_dir = cfg.extracts_dir().join("Książka");

        fs::write(&chapter_path, long_chapter(120)).expect("write long chapter");
        let long = process_chapter_file(&chapter_path, &cfg).expect("process long");
        assert!(long.outputs.len() > 1);

        fs::write(&chapter_path, long_chapter(3)).expect("write short chapter");
        let short = process_chapter_file(&chapter_path, &cfg).expect("process short");
        assert_eq!(short.outputs, vec![output_dir.join("rozdzial.txt")]);
        for stale in &long.outputs {
            assert!(!stale.exists(), "{} should be gone", stale.display());
        }

        fs::write(&chapter_path, " \n").expect("blank out chapter");
        let blank = process_chapter_file(&chapter_path, &cfg).expect("process blank");
        assert!(blank.outputs.is_empty());
        assert!(!output_dir.join("rozdzial.txt").exists());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn short_chapter_lands_in_single_file() {
        let root = unique_temp_dir("short_chapter");
        let book_dir = root.join("Zwierciadlana zagadka");
        fs::create_dir_all(&book_dir).expect("create book dir");
        let chapter_path = book_dir.join("Rozdział 1.txt");
        fs::write(&chapter_path, long_chapter(3)).expect("write chapter");

        let cfg = config_for(&root);
        let report = process_chapter_file(&chapter_path, &cfg).expect("process");
        assert_eq!(report.book_title, "Zwierciadlana zagadka");
        assert_eq!(report.page_count, 1);
        let expected = cfg
            .extracts_dir()
            .join("Zwierciadlana zagadka")
            .join("Rozdział 1.txt");
        assert_eq!(report.outputs, vec![expected.clone()]);

        let first = read_page(&expected, 1).expect("read").expect("page 1 exists");
        assert!(first.starts_with("Akapit 0."));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn long_chapter_is_split_with_global_page_numbers() {
        let root = unique_temp_dir("long_chapter");
        let book_dir = root.join("Książka");
        fs::create_dir_all(&book_dir).expect("create book dir");
        let chapter_path = book_dir.join("rozdzial.txt");
        fs::write(&chapter_path, long_chapter(120)).expect("write chapter");

        let cfg = config_for(&root);
        let report = process_chapter_file(&chapter_path, &cfg).expect("process");
        assert!(report.page_count > cfg.max_pages_per_file);
        assert!(report.outputs.len() > 1);
        for (idx, output) in report.outputs.iter().enumerate() {
            let name = output.file_name().expect("file name").to_string_lossy();
            assert_eq!(name, format!("rozdzial_part_{}.txt", idx + 1));
        }

        let mut numbers = Vec::new();
        for output in &report.outputs {
            let text = fs::read_to_string(output).expect("extract exists");
            numbers.extend(crate::extract_file::page_numbers(&text));
        }
        let expected: Vec<usize> = (1..=report.page_count).collect();
        assert_eq!(numbers, expected);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn layout_normalizes_decomposed_text() {
        let decomposed = "Z\u{0307}o\u{0301}łw.";
        let chapter = Chapter::layout(decomposed, &AppConfig::default());
        assert_eq!(chapter.lines, vec!["Żółw.".to_string()]);
    }
}
