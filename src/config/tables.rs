use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    pagination: PaginationConfig,
    #[serde(default)]
    wrapping: WrappingConfig,
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            preferred_lines_page: tables.pagination.preferred_lines_page,
            max_lines_page: tables.pagination.max_lines_page,
            min_lines_page: tables.pagination.min_lines_page,
            max_pages_per_file: tables.pagination.max_pages_per_file,
            line_width: tables.wrapping.line_width,
            short_word_max_len: tables.wrapping.short_word_max_len,
            books_dir: tables.paths.books_dir,
            extracts_dir: tables.paths.extracts_dir,
            write_index_json: tables.output.write_index_json,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            pagination: PaginationConfig {
                preferred_lines_page: config.preferred_lines_page,
                max_lines_page: config.max_lines_page,
                min_lines_page: config.min_lines_page,
                max_pages_per_file: config.max_pages_per_file,
            },
            wrapping: WrappingConfig {
                line_width: config.line_width,
                short_word_max_len: config.short_word_max_len,
            },
            paths: PathsConfig {
                books_dir: config.books_dir.clone(),
                extracts_dir: config.extracts_dir.clone(),
            },
            output: OutputConfig {
                write_index_json: config.write_index_json,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PaginationConfig {
    #[serde(default = "defaults::default_preferred_lines_page")]
    preferred_lines_page: usize,
    #[serde(default = "defaults::default_max_lines_page")]
    max_lines_page: usize,
    #[serde(default = "defaults::default_min_lines_page")]
    min_lines_page: usize,
    #[serde(default = "defaults::default_max_pages_per_file")]
    max_pages_per_file: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig {
            preferred_lines_page: defaults::default_preferred_lines_page(),
            max_lines_page: defaults::default_max_lines_page(),
            min_lines_page: defaults::default_min_lines_page(),
            max_pages_per_file: defaults::default_max_pages_per_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct WrappingConfig {
    #[serde(default = "defaults::default_line_width")]
    line_width: usize,
    #[serde(default = "defaults::default_short_word_max_len")]
    short_word_max_len: usize,
}

impl Default for WrappingConfig {
    fn default() -> Self {
        WrappingConfig {
            line_width: defaults::default_line_width(),
            short_word_max_len: defaults::default_short_word_max_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PathsConfig {
    #[serde(default = "defaults::default_books_dir")]
    books_dir: String,
    #[serde(default = "defaults::default_extracts_dir")]
    extracts_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            books_dir: defaults::default_books_dir(),
            extracts_dir: defaults::default_extracts_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct OutputConfig {
    #[serde(default = "defaults::default_write_index_json")]
    write_index_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            write_index_json: defaults::default_write_index_json(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
