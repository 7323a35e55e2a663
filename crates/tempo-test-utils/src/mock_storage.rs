// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for deterministic testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tempo_core::catalog::CatalogNode;
use tempo_core::traits::adapter::PluginAdapter;
use tempo_core::traits::storage::StorageAdapter;
use tempo_core::types::{AdapterType, CompletedSession, HealthStatus, UserTotal};
use tempo_core::TempoError;

/// A mock storage backend holding everything in memory.
///
/// Completed sessions are kept per project and summaries are computed on
/// the fly with the same grouping and ordering the SQLite backend uses.
pub struct MockStorage {
    catalogs: Mutex<HashMap<String, (String, CatalogNode)>>,
    completed: Mutex<Vec<(String, CompletedSession)>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            catalogs: Mutex::new(HashMap::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Preload a task catalog, as if it had been uploaded earlier.
    pub async fn preload_catalog(&self, project: &str, raw: &str) -> Result<(), TempoError> {
        let catalog = CatalogNode::from_toml_str(raw)?;
        self.catalogs
            .lock()
            .await
            .insert(project.to_string(), (raw.to_string(), catalog));
        Ok(())
    }

    /// All completed sessions appended for a project, in append order.
    pub async fn completed_sessions(&self, project: &str) -> Vec<CompletedSession> {
        self.completed
            .lock()
            .await
            .iter()
            .filter(|(p, _)| p == project)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockStorage {
    fn name(&self) -> &str {
        "mock-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TempoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TempoError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MockStorage {
    async fn initialize(&self) -> Result<(), TempoError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TempoError> {
        Ok(())
    }

    async fn append_completed_session(
        &self,
        project: &str,
        session: &CompletedSession,
    ) -> Result<(), TempoError> {
        self.completed
            .lock()
            .await
            .push((project.to_string(), session.clone()));
        Ok(())
    }

    async fn task_catalog(&self, project: &str) -> Result<Option<CatalogNode>, TempoError> {
        Ok(self
            .catalogs
            .lock()
            .await
            .get(project)
            .map(|(_, catalog)| catalog.clone()))
    }

    async fn replace_task_catalog(
        &self,
        project: &str,
        raw: &str,
        catalog: &CatalogNode,
    ) -> Result<(), TempoError> {
        self.catalogs
            .lock()
            .await
            .insert(project.to_string(), (raw.to_string(), catalog.clone()));
        Ok(())
    }

    async fn summary(&self, project: &str) -> Result<Vec<UserTotal>, TempoError> {
        let completed = self.completed.lock().await;
        let mut totals: Vec<UserTotal> = Vec::new();
        for (_, session) in completed.iter().filter(|(p, _)| p == project) {
            let username = session.session().author.0.clone();
            let seconds = session.duration().num_milliseconds() as f64 / 1000.0;
            match totals.iter_mut().find(|t| t.username == username) {
                Some(total) => total.total_seconds += seconds,
                None => totals.push(UserTotal {
                    username,
                    total_seconds: seconds,
                }),
            }
        }
        totals.sort_by(|a, b| {
            b.total_seconds
                .partial_cmp(&a.total_seconds)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ts;
    use tempo_core::types::{Session, Username};

    fn completed(author: &str, start: i64, stop: i64) -> CompletedSession {
        CompletedSession::new(
            Session::new(Username(author.into()), ts(start), None, None),
            ts(stop),
            None,
        )
    }

    #[tokio::test]
    async fn summary_groups_and_orders_by_total() {
        let storage = MockStorage::new();
        storage
            .append_completed_session("project", &completed("@alice", 0, 60))
            .await
            .unwrap();
        storage
            .append_completed_session("project", &completed("@bob", 0, 3600))
            .await
            .unwrap();
        storage
            .append_completed_session("project", &completed("@alice", 100, 160))
            .await
            .unwrap();

        let totals = storage.summary("project").await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].username, "@bob");
        assert_eq!(totals[0].total_seconds, 3600.0);
        assert_eq!(totals[1].username, "@alice");
        assert_eq!(totals[1].total_seconds, 120.0);
    }

    #[tokio::test]
    async fn catalog_round_trip() {
        let storage = MockStorage::new();
        assert!(storage.task_catalog("project").await.unwrap().is_none());

        storage
            .preload_catalog("project", "manger = 1\ndormir = 2\n")
            .await
            .unwrap();
        let catalog = storage.task_catalog("project").await.unwrap().unwrap();
        assert_eq!(catalog.keys(), vec!["manger", "dormir"]);
    }

    #[tokio::test]
    async fn sessions_are_scoped_per_project() {
        let storage = MockStorage::new();
        storage
            .append_completed_session("a", &completed("@alice", 0, 60))
            .await
            .unwrap();

        assert_eq!(storage.completed_sessions("a").await.len(), 1);
        assert!(storage.completed_sessions("b").await.is_empty());
        assert!(storage.summary("b").await.unwrap().is_empty());
    }
}
