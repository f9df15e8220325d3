//! Configuration loading for the pager.
//!
//! All tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! defaults so a batch run can still proceed.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, serialize_config};
pub use models::{AppConfig, LogLevel};
