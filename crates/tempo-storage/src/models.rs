// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the storage schema.

use chrono::{DateTime, NaiveDateTime, Utc};

use tempo_core::types::CompletedSession;

/// Timestamp format used in the `sessions` table.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the `sessions` table (without the rowid).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub project: String,
    pub task: Option<String>,
    pub username: String,
    pub start: String,
    pub stop: String,
    pub duration_seconds: f64,
    pub start_comment: Option<String>,
    pub stop_comment: Option<String>,
}

impl SessionRow {
    /// Flatten a completed session into its stored representation.
    pub fn from_completed(project: &str, completed: &CompletedSession) -> Self {
        let session = completed.session();
        Self {
            project: project.to_string(),
            task: session.task.clone(),
            username: session.author.0.clone(),
            start: session.start.format(DATETIME_FORMAT).to_string(),
            stop: completed.stop().format(DATETIME_FORMAT).to_string(),
            duration_seconds: completed.duration().num_milliseconds() as f64 / 1000.0,
            start_comment: session.start_comment.clone(),
            stop_comment: completed.stop_comment().map(str::to_string),
        }
    }

    /// Parse the stored start timestamp back into a UTC datetime.
    pub fn start_datetime(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.start, DATETIME_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}
