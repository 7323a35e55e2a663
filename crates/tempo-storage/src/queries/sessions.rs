// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completed-session inserts and the per-project time summary.

use rusqlite::params;

use tempo_core::types::{CompletedSession, UserTotal};
use tempo_core::TempoError;

use crate::database::Database;
use crate::models::SessionRow;

/// Append one completed session to the project's history.
pub async fn insert_completed_session(
    db: &Database,
    project: &str,
    completed: &CompletedSession,
) -> Result<(), TempoError> {
    let row = SessionRow::from_completed(project, completed);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions
                 (project, task, username, start, stop, duration, start_comment, stop_comment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.project,
                    row.task,
                    row.username,
                    row.start,
                    row.stop,
                    row.duration_seconds,
                    row.start_comment,
                    row.stop_comment,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Total seconds worked per user for one project, most time first.
pub async fn summary(db: &Database, project: &str) -> Result<Vec<UserTotal>, TempoError> {
    let project = project.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT username, SUM(duration)
                 FROM sessions
                 WHERE project = ?1
                 GROUP BY username
                 ORDER BY SUM(duration) DESC",
            )?;
            let rows = stmt.query_map(params![project], |row| {
                Ok(UserTotal {
                    username: row.get(0)?,
                    total_seconds: row.get(1)?,
                })
            })?;
            let mut totals = Vec::new();
            for row in rows {
                totals.push(row?);
            }
            Ok(totals)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
