//! Dividing a whole-book text file into chapter files.
//!
//! The rules follow the layout of the plain-text editions the books come
//! from: a short header ending in an ISBN line, then chapters separated by
//! three blank lines. They are format heuristics, not a general parser; when
//! the header is not recognized the file has to be fixed by hand.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const ISBN_MARKER: &str = "ISBN";
const TRANSLATOR_MARKER: &str = "tłum.";
const EDITOR_NOTE_TITLE: &str = "-----";
const SECTION_BREAK: &str = "*";
const CHAPTER_GAP: i32 = 3;
const MAX_EXTRA_HEADER_LINES: usize = 5;

#[derive(Debug, Error)]
pub enum BookSplitError {
    #[error("book file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error(
        "unrecognized book header (no ISBN line near line {line}); fix the file manually and retry"
    )]
    UnrecognizedHeader { line: usize },
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub translator: Option<String>,
    /// Chapter titles keyed by 1-based chapter number.
    pub chapters: BTreeMap<usize, String>,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.translator {
            Some(translator) => write!(
                f,
                "\"{}\" trans. {}  by {} {}",
                self.title, translator, self.author, self.isbn
            )?,
            None => write!(f, "\"{}\" {} {}", self.title, self.author, self.isbn)?,
        }
        for (number, title) in &self.chapters {
            write!(f, "\n{number} {title}")?;
        }
        Ok(())
    }
}

/// A chapter's title and its non-blank body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterText {
    pub title: String,
    pub lines: Vec<String>,
}

/// Parse the book header. Returns the book and the index of the first line
/// after the ISBN line.
pub fn parse_header(lines: &[&str]) -> Result<(Book, usize), BookSplitError> {
    let line_at = |idx: usize| lines.get(idx).map_or("", |line| line.trim());

    let author = line_at(0).to_string();
    let mut title_lines = vec![line_at(1).to_string()];
    let mut translator = None;

    let mut idx = 2;
    let mut extra = 0;
    while !line_at(idx).contains(ISBN_MARKER) {
        let line = line_at(idx);
        if let Some(pos) = line.find(TRANSLATOR_MARKER) {
            translator = Some(line[pos + TRANSLATOR_MARKER.len()..].trim().to_string());
        } else if !line.is_empty() {
            title_lines.push(line.to_string());
        }
        idx += 1;
        extra += 1;
        if extra > MAX_EXTRA_HEADER_LINES {
            return Err(BookSplitError::UnrecognizedHeader { line: idx + 1 });
        }
    }

    let book = Book {
        title: title_lines.join(" ").trim().to_string(),
        author,
        isbn: line_at(idx).to_string(),
        translator,
        chapters: BTreeMap::new(),
    };
    Ok((book, idx + 1))
}

/// Split the lines after the header into chapters.
///
/// Leading blank lines are skipped, the first line is the title, and the
/// body runs until three consecutive blank lines. A lone `*` line needs one
/// extra blank line before the chapter can end.
pub fn divide_chapters(lines: &[&str]) -> Vec<ChapterText> {
    let mut chapters = Vec::new();
    let mut idx = 0;

    loop {
        while idx < lines.len() && lines[idx].trim().is_empty() {
            idx += 1;
        }
        if idx >= lines.len() {
            break;
        }

        let title = lines[idx].trim().to_string();
        idx += 1;
        let (body, next) = take_body(lines, idx, true);
        idx = next;
        debug!(title = %title, lines = body.len(), "Found chapter");
        chapters.push(ChapterText { title, lines: body });
    }

    chapters
}

/// Body lines from `start` up to the closing gap, and the index just past it.
/// With `section_breaks`, a lone `*` line pushes the gap one blank line further.
fn take_body(lines: &[&str], start: usize, section_breaks: bool) -> (Vec<String>, usize) {
    let mut body = Vec::new();
    let mut blank_run = 0i32;
    let mut idx = start;
    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == CHAPTER_GAP {
                break;
            }
        } else {
            blank_run = 0;
            body.push(line.to_string());
        }
        if section_breaks && line.trim() == SECTION_BREAK {
            blank_run = -1;
        }
    }
    (body, idx)
}

/// Body of a book with a single chapter: everything between the first and
/// second gaps of the whole file.
fn single_chapter_body(lines: &[&str]) -> Vec<String> {
    let (_, after_front_matter) = take_body(lines, 0, false);
    take_body(lines, after_front_matter, false).0
}

/// Split a whole book's text into its metadata and chapters.
pub fn split_book_text(text: &str) -> Result<(Book, Vec<ChapterText>), BookSplitError> {
    let lines: Vec<&str> = text.lines().collect();
    let (mut book, body_start) = parse_header(&lines)?;

    let mut chapters = divide_chapters(&lines[body_start.min(lines.len())..]);
    let before = chapters.len();
    chapters.retain(|chapter| chapter.title != EDITOR_NOTE_TITLE);
    if chapters.len() != before {
        debug!("Dropped editor's note");
    }

    if chapters.len() == 1 {
        info!("One-chapter book detected");
        chapters = vec![ChapterText {
            title: book.title.clone(),
            lines: single_chapter_body(&lines),
        }];
    }

    book.chapters = chapters
        .iter()
        .enumerate()
        .map(|(idx, chapter)| (idx + 1, chapter.title.clone()))
        .collect();
    Ok((book, chapters))
}

/// Split `book_path` into `<books_dir>/<title>/<chapter title>.txt` files.
pub fn split_book_file(book_path: &Path, books_dir: &Path) -> Result<Book, BookSplitError> {
    let text = match fs::read_to_string(book_path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(BookSplitError::NotFound(book_path.to_path_buf()));
        }
        Err(source) => {
            return Err(BookSplitError::Io {
                path: book_path.to_path_buf(),
                source,
            });
        }
    };

    let (book, chapters) = split_book_text(&text)?;
    let book_dir = books_dir.join(file_safe(&book.title));
    fs::create_dir_all(&book_dir).map_err(|source| BookSplitError::Io {
        path: book_dir.clone(),
        source,
    })?;

    for chapter in &chapters {
        let path = book_dir.join(format!("{}.txt", file_safe(&chapter.title)));
        if path.exists() {
            warn!(path = %path.display(), "Overwriting existing chapter file");
        }
        let mut body = chapter.lines.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(&path, body).map_err(|source| BookSplitError::Io {
            path: path.clone(),
            source,
        })?;
    }

    info!(
        title = %book.title,
        chapters = chapters.len(),
        dir = %book_dir.display(),
        "Split book into chapters"
    );
    Ok(book)
}

fn file_safe(name: &str) -> String {
    name.replace(['/', '\\'], "-")
}
