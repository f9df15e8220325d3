use super::defaults;
use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

/// Parse the table layout of `config.toml` and repair inconsistent numbers.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("Failed to parse config TOML")?;
    Ok(sanitize(tables.into()))
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    let tables = ConfigTables::from(config);
    toml::to_string(&tables).context("Failed to serialize config")
}

fn sanitize(mut config: AppConfig) -> AppConfig {
    let limits_ok = config.min_lines_page > 0
        && config.min_lines_page <= config.preferred_lines_page
        && config.preferred_lines_page <= config.max_lines_page;
    if !limits_ok {
        warn!(
            preferred = config.preferred_lines_page,
            max = config.max_lines_page,
            min = config.min_lines_page,
            "Page sizes must satisfy 0 < min <= preferred <= max; using defaults"
        );
        config.preferred_lines_page = defaults::default_preferred_lines_page();
        config.max_lines_page = defaults::default_max_lines_page();
        config.min_lines_page = defaults::default_min_lines_page();
    }
    if config.max_pages_per_file == 0 {
        warn!("max_pages_per_file must be positive; using default");
        config.max_pages_per_file = defaults::default_max_pages_per_file();
    }
    if config.line_width == 0 {
        warn!("line_width must be positive; using default");
        config.line_width = defaults::default_line_width();
    }
    config
}
