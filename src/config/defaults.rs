pub(crate) fn default_preferred_lines_page() -> usize {
    15
}

pub(crate) fn default_max_lines_page() -> usize {
    20
}

pub(crate) fn default_min_lines_page() -> usize {
    5
}

pub(crate) fn default_max_pages_per_file() -> usize {
    10
}

pub(crate) fn default_line_width() -> usize {
    60
}

pub(crate) fn default_short_word_max_len() -> usize {
    2
}

pub(crate) fn default_books_dir() -> String {
    "books".to_string()
}

pub(crate) fn default_extracts_dir() -> String {
    "extracts".to_string()
}

pub(crate) fn default_write_index_json() -> bool {
    false
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
