//! Command-line and environment configuration.
//!
//! Every flag can also come from the environment; a `.env` file in the
//! working directory is loaded before parsing (see `main`).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::Tab;

#[derive(Debug, Parser)]
#[command(name = "newsdesk")]
#[command(about = "Terminal dashboard for the news agent backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend origin, e.g. http://localhost:8000
    #[arg(env = "NEWSDESK_BACKEND", default_value = "http://localhost:8000")]
    pub backend: String,

    /// Per-request timeout in seconds; 0 waits forever
    #[arg(long, env = "NEWSDESK_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Timeout in seconds for a manual scrape, which summarises every new
    /// article before answering; 0 waits forever
    #[arg(long, env = "NEWSDESK_SCRAPE_TIMEOUT_SECS", default_value_t = 600)]
    pub scrape_timeout_secs: u64,

    /// View shown at startup
    #[arg(long, env = "NEWSDESK_TAB", value_enum, default_value = "news")]
    pub tab: Tab,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long, env = "NEWSDESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "NEWSDESK_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn scrape_timeout(&self) -> Option<Duration> {
        (self.scrape_timeout_secs > 0).then(|| Duration::from_secs(self.scrape_timeout_secs))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("newsdesk.log"))
    }
}
