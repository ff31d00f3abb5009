pub mod cli;
pub mod dispatch;

use std::fs::OpenOptions;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tagpick_app::App;
use tagpick_core::config::{load_config_or_default, resolve_config_path};
use tagpick_core::store::{FileTagStore, default_store_dir};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config_path = resolve_config_path().context("failed to resolve config path")?;
    let config = load_config_or_default(&config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry. See README.md for setup instructions.",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded configuration");

    let store_dir = match &config.store_dir {
        Some(dir) => dir.clone(),
        None => default_store_dir(&config_path).ok_or_else(|| {
            anyhow!(
                "failed to derive a store directory from config path {}",
                config_path.display()
            )
        })?,
    };

    let store = FileTagStore::new(store_dir.clone());
    let app = App::new(&store);

    dispatch::run_with_deps(cli, &app, &config, &store_dir)
}

/// File logging is opt-in via TAGPICK_LOG_FILE so the alternate-screen UI
/// never shares stdout with log output.
fn init_tracing() -> Result<()> {
    let Ok(log_path) = std::env::var("TAGPICK_LOG_FILE") else {
        return Ok(());
    };
    if log_path.is_empty() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {log_path}"))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with(file_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    Ok(())
}
