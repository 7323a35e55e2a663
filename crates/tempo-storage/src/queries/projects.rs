// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task-catalog storage.
//!
//! The catalog is stored twice: the raw TOML document in `projects.tasks_doc`
//! (the authoritative copy, re-parsed on load so key order survives), and a
//! flattened leaf list in `tasks` for reporting queries.

use rusqlite::params;

use tempo_core::catalog::CatalogNode;
use tempo_core::TempoError;

use crate::database::Database;

/// Load and parse a project's task catalog, if one has been uploaded.
pub async fn task_catalog(db: &Database, project: &str) -> Result<Option<CatalogNode>, TempoError> {
    let project = project.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT tasks_doc FROM projects WHERE project = ?1",
                params![project],
                |row| row.get(0),
            );
            match result {
                Ok(raw) => Ok(Some(raw)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match raw {
        Some(raw) => Ok(Some(CatalogNode::from_toml_str(&raw)?)),
        None => Ok(None),
    }
}

/// Replace a project's task catalog.
///
/// Drops the previous catalog and flattened task rows for the project in one
/// transaction, then stores the new document and its leaves.
pub async fn replace_task_catalog(
    db: &Database,
    project: &str,
    raw: &str,
    catalog: &CatalogNode,
) -> Result<(), TempoError> {
    let project = project.to_string();
    let raw = raw.to_string();
    let leaves: Vec<(String, f64)> = catalog
        .leaves()
        .into_iter()
        .map(|(task, workload)| (task.to_string(), workload))
        .collect();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tasks WHERE project = ?1", params![project])?;
            tx.execute("DELETE FROM projects WHERE project = ?1", params![project])?;
            tx.execute(
                "INSERT INTO projects (project, tasks_doc) VALUES (?1, ?2)",
                params![project, raw],
            )?;
            for (task, workload) in &leaves {
                tx.execute(
                    "INSERT INTO tasks (task, project, workload) VALUES (?1, ?2, ?3)",
                    params![task, project, workload],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG: &str = "[manger]\npoulet = 1\npoisson = 2\n";

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn catalog_absent_for_unknown_project() {
        let (db, _dir) = setup_db().await;
        let catalog = task_catalog(&db, "nope").await.unwrap();
        assert!(catalog.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_then_load_round_trips() {
        let (db, _dir) = setup_db().await;
        let parsed = CatalogNode::from_toml_str(CATALOG).unwrap();
        replace_task_catalog(&db, "proj", CATALOG, &parsed)
            .await
            .unwrap();

        let loaded = task_catalog(&db, "proj").await.unwrap().unwrap();
        assert_eq!(loaded, parsed);
        assert_eq!(loaded.keys(), vec!["manger"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_overwrites_previous_catalog() {
        let (db, _dir) = setup_db().await;
        let first = CatalogNode::from_toml_str(CATALOG).unwrap();
        replace_task_catalog(&db, "proj", CATALOG, &first)
            .await
            .unwrap();

        let second_raw = "dormir = 8\n";
        let second = CatalogNode::from_toml_str(second_raw).unwrap();
        replace_task_catalog(&db, "proj", second_raw, &second)
            .await
            .unwrap();

        let loaded = task_catalog(&db, "proj").await.unwrap().unwrap();
        assert_eq!(loaded.keys(), vec!["dormir"]);

        // Flattened rows from the first catalog must be gone.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT COUNT(*) FROM tasks WHERE project = 'proj'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(n)
            })
            .await
            .map_err(crate::database::map_tr_err)
            .unwrap();
        assert_eq!(count, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn replace_stores_flattened_leaves() {
        let (db, _dir) = setup_db().await;
        let parsed = CatalogNode::from_toml_str(CATALOG).unwrap();
        replace_task_catalog(&db, "proj", CATALOG, &parsed)
            .await
            .unwrap();

        let rows: Vec<(String, f64)> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT task, workload FROM tasks WHERE project = 'proj' ORDER BY id",
                )?;
                let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
            .map_err(crate::database::map_tr_err)
            .unwrap();
        assert_eq!(
            rows,
            vec![("poulet".to_string(), 1.0), ("poisson".to_string(), 2.0)]
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn catalogs_are_scoped_per_project() {
        let (db, _dir) = setup_db().await;
        let parsed = CatalogNode::from_toml_str(CATALOG).unwrap();
        replace_task_catalog(&db, "proj-a", CATALOG, &parsed)
            .await
            .unwrap();

        assert!(task_catalog(&db, "proj-a").await.unwrap().is_some());
        assert!(task_catalog(&db, "proj-b").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
