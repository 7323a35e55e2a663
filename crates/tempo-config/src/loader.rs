// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tempo.toml` > `~/.config/tempo/tempo.toml` > `/etc/tempo/tempo.toml`
//! with environment variable overrides via `TEMPO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TempoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tempo/tempo.toml` (system-wide)
/// 3. `~/.config/tempo/tempo.toml` (user XDG config)
/// 4. `./tempo.toml` (local directory)
/// 5. `TEMPO_*` environment variables
pub fn load_config() -> Result<TempoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TempoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TempoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TempoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TempoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TempoConfig::default()))
        .merge(Toml::file("/etc/tempo/tempo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tempo/tempo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tempo.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TEMPO_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TEMPO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TEMPO_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
