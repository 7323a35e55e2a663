// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tempo_config::model::StorageConfig;
use tempo_core::catalog::CatalogNode;
use tempo_core::types::{CompletedSession, UserTotal};
use tempo_core::{AdapterType, HealthStatus, PluginAdapter, StorageAdapter, TempoError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, TempoError> {
        self.db.get().ok_or_else(|| TempoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TempoError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TempoError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), TempoError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TempoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), TempoError> {
        self.db()?.close().await
    }

    async fn append_completed_session(
        &self,
        project: &str,
        session: &CompletedSession,
    ) -> Result<(), TempoError> {
        queries::sessions::insert_completed_session(self.db()?, project, session).await
    }

    async fn task_catalog(&self, project: &str) -> Result<Option<CatalogNode>, TempoError> {
        queries::projects::task_catalog(self.db()?, project).await
    }

    async fn replace_task_catalog(
        &self,
        project: &str,
        raw: &str,
        catalog: &CatalogNode,
    ) -> Result<(), TempoError> {
        queries::projects::replace_task_catalog(self.db()?, project, raw, catalog).await
    }

    async fn summary(&self, project: &str) -> Result<Vec<UserTotal>, TempoError> {
        queries::sessions::summary(self.db()?, project).await
    }
}
