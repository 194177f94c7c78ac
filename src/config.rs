//! Command-line / environment configuration and config-file locations.
//!
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

const APP_DIR: &str = "user-dashboard";

/// Page shown on startup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StartPage {
    #[default]
    Home,
    Data,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "user-dashboard", version, about = "Browse users fetched from a REST API")]
pub struct Cli {
    /// Base URL of the API serving `/users`.
    #[arg(long, env = "USER_DASHBOARD_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "USER_DASHBOARD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = parse_positive_u64)]
    pub timeout_secs: u64,

    /// Initial number of rows per page.
    #[arg(long, default_value_t = crate::app::state::DEFAULT_ITEMS_PER_PAGE, value_parser = parse_positive_usize)]
    pub items_per_page: usize,

    #[arg(long, value_enum, default_value_t = StartPage::Home)]
    pub start_page: StartPage,

    /// Log file (the terminal belongs to the UI). Filter with RUST_LOG.
    #[arg(long, env = "USER_DASHBOARD_LOG", default_value = "user-dashboard.log")]
    pub log_file: PathBuf,

    /// Directory holding `theme.conf` and `keybinds.conf`.
    #[arg(long, env = "USER_DASHBOARD_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Path where a config file is read from and, when missing, written to.
    /// An explicit `--config-dir` is used as-is.
    pub fn config_path(&self, name: &str) -> PathBuf {
        match &self.config_dir {
            Some(dir) => dir.join(name),
            None => config_file_read_path(name).unwrap_or_else(|| config_file_write_path(name)),
        }
    }
}

fn parse_positive_u64(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_positive_usize(s: &str) -> Result<usize, String> {
    parse_positive_u64(s).and_then(|n| usize::try_from(n).map_err(|e| e.to_string()))
}

/// Per-user config directory: `$XDG_CONFIG_HOME/user-dashboard`, else
/// `$HOME/.config/user-dashboard`. `None` when neither variable is set.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

/// Existing config file with this name, searched in the config dir then the working directory.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    config_dir()
        .map(|d| d.join(name))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(name)))
        .find(|p| p.exists())
}

/// Where a fresh config file should be written; creates the config dir if needed.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir.join(name),
        _ => PathBuf::from(name),
    }
}
