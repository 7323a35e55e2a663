// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait.

use async_trait::async_trait;

use crate::catalog::CatalogNode;
use crate::error::TempoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletedSession, UserTotal};

/// Durable persistence for completed sessions and task catalogs.
///
/// All methods are keyed by `project`, the chat name. In-progress sessions
/// never reach storage; only sealed [`CompletedSession`] records do.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Open the backend and run any pending schema migrations.
    async fn initialize(&self) -> Result<(), TempoError>;

    /// Flush and close the backend.
    async fn close(&self) -> Result<(), TempoError>;

    /// Append one completed session to the project's history.
    async fn append_completed_session(
        &self,
        project: &str,
        session: &CompletedSession,
    ) -> Result<(), TempoError>;

    /// Load the project's current task catalog, if one has been uploaded.
    async fn task_catalog(&self, project: &str) -> Result<Option<CatalogNode>, TempoError>;

    /// Replace the project's task catalog. `raw` is the source document as
    /// uploaded; it is stored verbatim so the catalog can be re-parsed later.
    async fn replace_task_catalog(
        &self,
        project: &str,
        raw: &str,
        catalog: &CatalogNode,
    ) -> Result<(), TempoError>;

    /// Total time per user for the project, most time first.
    async fn summary(&self, project: &str) -> Result<Vec<UserTotal>, TempoError>;
}
