// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tempo serve` command implementation.
//!
//! Starts the bot with the configured Telegram transport and SQLite
//! storage, then runs the session tracker loop until a shutdown signal
//! arrives.

use std::sync::Arc;

use tracing::{error, info};

use tempo_config::model::TempoConfig;
use tempo_core::error::TempoError;
use tempo_core::{ChannelAdapter, PluginAdapter, StorageAdapter};
use tempo_tracker::{install_signal_handler, SessionTracker};

#[cfg(feature = "sqlite")]
use tempo_storage::SqliteStorage;

#[cfg(feature = "telegram")]
use tempo_telegram::TelegramChannel;

/// Runs the `tempo serve` command.
///
/// Initializes storage and the chat transport, then drives the session
/// tracker until SIGINT or SIGTERM.
pub async fn run_serve(config: TempoConfig) -> Result<(), TempoError> {
    // Initialize tracing subscriber.
    init_tracing(&config.agent.log_level);

    info!("starting tempo serve");

    // Initialize storage.
    #[cfg(feature = "sqlite")]
    let storage = {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        Arc::new(storage)
    };

    #[cfg(not(feature = "sqlite"))]
    compile_error!("tempo requires the 'sqlite' feature for storage");

    // Initialize and connect the Telegram transport.
    #[cfg(feature = "telegram")]
    let transport = {
        let mut telegram = TelegramChannel::new(config.telegram.clone()).map_err(|e| {
            error!(error = %e, "failed to initialize Telegram channel");
            eprintln!(
                "error: Telegram bot token required. Set telegram.bot_token in tempo.toml \
                 or the TEMPO_TELEGRAM_BOT_TOKEN environment variable."
            );
            e
        })?;
        telegram.connect().await?;
        info!("telegram channel connected");
        Arc::new(telegram)
    };

    #[cfg(not(feature = "telegram"))]
    compile_error!("tempo requires the 'telegram' feature for the chat transport");

    // Install signal handler.
    let cancel = install_signal_handler();

    let mut tracker = SessionTracker::new(transport.clone(), storage.clone());
    tracker.run(cancel).await?;

    // Drain and close the adapters.
    transport.shutdown().await?;
    storage.close().await?;

    info!("tempo serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tempo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
