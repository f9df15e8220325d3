use crate::line_wrap::WrapOptions;
use crate::pagination::PageLimits;
use serde::Deserialize;
use std::path::PathBuf;

/// Flattened view of `config.toml`; the file itself is grouped into tables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub preferred_lines_page: usize,
    pub max_lines_page: usize,
    pub min_lines_page: usize,
    pub max_pages_per_file: usize,
    pub line_width: usize,
    pub short_word_max_len: usize,
    pub books_dir: String,
    pub extracts_dir: String,
    pub write_index_json: bool,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            preferred_lines_page: crate::config::defaults::default_preferred_lines_page(),
            max_lines_page: crate::config::defaults::default_max_lines_page(),
            min_lines_page: crate::config::defaults::default_min_lines_page(),
            max_pages_per_file: crate::config::defaults::default_max_pages_per_file(),
            line_width: crate::config::defaults::default_line_width(),
            short_word_max_len: crate::config::defaults::default_short_word_max_len(),
            books_dir: crate::config::defaults::default_books_dir(),
            extracts_dir: crate::config::defaults::default_extracts_dir(),
            write_index_json: crate::config::defaults::default_write_index_json(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            preferred: self.preferred_lines_page,
            max: self.max_lines_page,
            min: self.min_lines_page,
        }
    }

    pub fn wrap_options(&self) -> WrapOptions {
        WrapOptions {
            max_line_width: self.line_width,
            short_word_max_len: self.short_word_max_len,
        }
    }

    pub fn books_dir(&self) -> PathBuf {
        PathBuf::from(&self.books_dir)
    }

    pub fn extracts_dir(&self) -> PathBuf {
        PathBuf::from(&self.extracts_dir)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
