//! Tracing setup.
//!
//! The UI owns stdout, so events go to a log file instead. `RUST_LOG` wins
//! over the configured default filter.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Build a subscriber appending plain-text events to `path`.
pub fn get_subscriber(path: &Path, env_filter: &str) -> Result<impl Subscriber + Send + Sync> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let fmt = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    Ok(Registry::default().with(env_filter).with(fmt))
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> Result<()> {
    set_global_default(subscriber).context("failed to install tracing subscriber")
}
