// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tempo time-tracking bot.

use thiserror::Error;

/// The primary error type used across all Tempo adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TempoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, send failure, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed task catalog (unparseable document or non-table root).
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A menu selection matched no catalog key, neither exactly nor by prefix.
    ///
    /// This indicates a malformed catalog or a spoofed selection identifier
    /// and must be raised before any dialogue state is mutated.
    #[error("selection `{key}` not found in task catalog")]
    SelectionNotFound { key: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
