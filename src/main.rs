//! Entry point for the riddle pager.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load configuration from `conf/config.toml` (or `--config`).
//! - Dispatch to chapter pagination, batch pagination, book splitting or
//!   page lookup.

mod batch;
mod book_split;
mod chapter;
mod config;
mod extract_file;
mod line_wrap;
mod pagination;
mod parts;
mod text_utils;

use crate::batch::process_all_books;
use crate::book_split::split_book_file;
use crate::chapter::process_chapter_file;
use crate::config::{AppConfig, load_config, serialize_config};
use crate::extract_file::{page_numbers, read_page};
use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";
const USAGE: &str = "Usage: riddle-pager [--config <path>] <command>

Commands:
  chapter <file>          paginate one chapter file into extracts
  batch [books_dir]       paginate every chapter under the books directory
  split-book <file>       divide a whole book into chapter files
  page <extract> <n>      print page <n> of an extract file
  config                  print the effective configuration";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Chapter(PathBuf),
    Batch(Option<PathBuf>),
    SplitBook(PathBuf),
    Page { extract: PathBuf, number: usize },
    ShowConfig,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config_path: PathBuf,
    command: Command,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = load_config(&args.config_path);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        config = %args.config_path.display(),
        level = %config.log_level,
        "Starting riddle pager"
    );

    match args.command {
        Command::Chapter(path) => run_chapter(&path, &config),
        Command::Batch(dir) => run_batch(dir, &config),
        Command::SplitBook(path) => run_split_book(&path, &config),
        Command::Page { extract, number } => run_page(&extract, number),
        Command::ShowConfig => {
            println!("{}", serialize_config(&config)?);
            Ok(())
        }
    }
}

fn run_chapter(path: &Path, config: &AppConfig) -> Result<()> {
    let report = process_chapter_file(path, config)?;
    for output in &report.outputs {
        println!("{}", output.display());
    }
    Ok(())
}

fn run_batch(dir: Option<PathBuf>, config: &AppConfig) -> Result<()> {
    let books_dir = dir.unwrap_or_else(|| config.books_dir());
    let summary = process_all_books(&books_dir, config)?;
    println!(
        "{} chapter(s), {} page(s), {} failure(s)",
        summary.chapters.len(),
        summary.page_count(),
        summary.failures.len()
    );
    for (path, reason) in &summary.failures {
        println!("failed: {} ({reason})", path.display());
    }
    Ok(())
}

fn run_split_book(path: &Path, config: &AppConfig) -> Result<()> {
    let book = split_book_file(path, &config.books_dir())
        .with_context(|| format!("Failed to split {}", path.display()))?;
    println!("{book}");
    println!("Found {} chapter(s).", book.chapters.len());
    Ok(())
}

fn run_page(extract: &Path, number: usize) -> Result<()> {
    match read_page(extract, number)? {
        Some(page) => {
            print!("{page}");
            Ok(())
        }
        None => {
            let text = std::fs::read_to_string(extract)
                .with_context(|| format!("Failed to read {}", extract.display()))?;
            let available = page_numbers(&text);
            match (available.first(), available.last()) {
                (Some(first), Some(last)) => Err(anyhow!(
                    "Page {number} not found in {}; it holds pages {first}-{last}",
                    extract.display()
                )),
                _ => Err(anyhow!(
                    "Page {number} not found in {}; it holds no pages",
                    extract.display()
                )),
            }
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = args.into_iter().peekable();
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if args.peek().map(String::as_str) == Some("--config") {
        args.next();
        let path = args
            .next()
            .ok_or_else(|| anyhow!("--config needs a path\n\n{USAGE}"))?;
        config_path = PathBuf::from(path);
    }

    let name = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let command = match name.as_str() {
        "chapter" => {
            let path = required(&mut args, &name, "a chapter file")?;
            Command::Chapter(PathBuf::from(path))
        }
        "split-book" => {
            let path = required(&mut args, &name, "a book file")?;
            Command::SplitBook(PathBuf::from(path))
        }
        "page" => {
            let extract = PathBuf::from(required(&mut args, &name, "an extract file")?);
            let raw = required(&mut args, &name, "a page number")?;
            let number = raw
                .parse()
                .with_context(|| format!("Invalid page number: {raw}"))?;
            Command::Page { extract, number }
        }
        "batch" => Command::Batch(args.next().map(PathBuf::from)),
        "config" => Command::ShowConfig,
        other => return Err(anyhow!("Unknown command: {other}\n\n{USAGE}")),
    };
    Ok(Args {
        config_path,
        command,
    })
}

fn required(args: &mut impl Iterator<Item = String>, command: &str, what: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{command} needs {what}\n\n{USAGE}"))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
