// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait.

use async_trait::async_trait;

use crate::error::TempoError;
use crate::types::{AdapterType, HealthStatus};

/// Base trait implemented by every Tempo adapter.
///
/// Adapters are long-lived components owned by the runtime. They are
/// constructed from configuration, health-checked periodically, and shut
/// down when the runtime stops.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Stable, human-readable adapter name (e.g. `"telegram"`).
    fn name(&self) -> &str;

    /// Adapter version, for diagnostics.
    fn version(&self) -> semver::Version;

    /// Which adapter family this adapter belongs to.
    fn adapter_type(&self) -> AdapterType;

    /// Report current operational status.
    async fn health_check(&self) -> Result<HealthStatus, TempoError>;

    /// Release resources. Called once; the adapter is dropped afterwards.
    async fn shutdown(&self) -> Result<(), TempoError>;
}
