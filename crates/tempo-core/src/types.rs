// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Tempo framework.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Transport-level identity of a chat (group or direct conversation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

/// Display handle of a participant, e.g. `@alice`. Unique within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of a message within its chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// A chat as seen by the lifecycle controller.
///
/// `id` addresses the transport; `name` is the human-readable chat title
/// used as the project key for sessions and task catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
}

/// Bot commands recognized by the lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin the start dialogue (`/start`).
    Start,
    /// Begin the stop dialogue (`/stop`).
    Stop,
    /// Request a task-catalog upload (`/tasks`).
    LoadTasks,
    /// Show the reporting menu (`/data`).
    DataMenu,
}

/// Payload of an inbound event, by update kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// A recognized slash command.
    Command(Command),
    /// A slash command the bot does not know.
    UnknownCommand,
    /// A menu button press carrying its selection identifier.
    Callback { callback_id: String, data: String },
    /// Free text.
    Text(String),
    /// An uploaded document, already fetched as UTF-8 text.
    Document { content: String },
}

/// A single inbound event delivered by a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub chat: Chat,
    pub username: Username,
    pub timestamp: DateTime<Utc>,
    /// Identifier of the triggering message (for callbacks: the menu message).
    pub message_id: MessageId,
    pub payload: EventPayload,
}

/// Upper bound on the UTF-8 byte length of a selection identifier.
///
/// Identifiers longer than this are truncated before transmission; the
/// catalog's prefix resolution exists precisely to undo this truncation.
pub const SELECTION_MAX_BYTES: usize = 63;

/// Shorten a catalog key to fit the transport's selection-identifier budget.
///
/// Drops trailing characters until the UTF-8 encoding fits in
/// [`SELECTION_MAX_BYTES`]. Multi-byte characters are removed whole.
pub fn truncate_selection(key: &str) -> String {
    let mut key = key.to_string();
    while key.len() > SELECTION_MAX_BYTES {
        key.pop();
    }
    key
}

/// One pressable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    /// Selection identifier echoed back in the callback; at most
    /// [`SELECTION_MAX_BYTES`] bytes.
    pub data: String,
}

/// An inline menu, one button per row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Menu {
    pub buttons: Vec<MenuButton>,
}

impl Menu {
    /// Build a menu from catalog keys, truncating each selection identifier
    /// to the transport budget while keeping the full key as the label.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let buttons = keys
            .into_iter()
            .map(|key| MenuButton {
                label: key.to_string(),
                data: truncate_selection(key),
            })
            .collect();
        Self { buttons }
    }
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat: ChatId,
    pub text: String,
    pub menu: Option<Menu>,
}

impl OutboundMessage {
    pub fn text(chat: &ChatId, text: impl Into<String>) -> Self {
        Self {
            chat: chat.clone(),
            text: text.into(),
            menu: None,
        }
    }

    pub fn with_menu(chat: &ChatId, text: impl Into<String>, menu: Menu) -> Self {
        Self {
            chat: chat.clone(),
            text: text.into(),
            menu: Some(menu),
        }
    }
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    pub supports_edit: bool,
    pub supports_menus: bool,
    pub supports_documents: bool,
    pub max_message_length: Option<usize>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Channel,
    Storage,
}

// --- Session domain model ---

/// An in-progress work session for one user in one chat.
///
/// `start`, `start_comment`, and `task` are set once at construction and
/// never mutated. `task` and `start_comment` are independent: both, either,
/// or neither may be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub author: Username,
    pub start: DateTime<Utc>,
    pub start_comment: Option<String>,
    pub task: Option<String>,
}

impl Session {
    pub fn new(
        author: Username,
        start: DateTime<Utc>,
        start_comment: Option<String>,
        task: Option<String>,
    ) -> Self {
        Self {
            author,
            start,
            start_comment,
            task,
        }
    }
}

/// Immutable record of a finished session.
///
/// `duration` is computed once at construction; the fields are private so
/// `duration == stop - session.start` holds for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSession {
    session: Session,
    stop: DateTime<Utc>,
    stop_comment: Option<String>,
    duration: TimeDelta,
}

impl CompletedSession {
    /// Seal a session with its stop time and optional stop comment.
    ///
    /// The session must already have been removed from the session ledger;
    /// ownership transfers here.
    pub fn new(session: Session, stop: DateTime<Utc>, stop_comment: Option<String>) -> Self {
        let duration = stop - session.start;
        Self {
            session,
            stop,
            stop_comment,
            duration,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    pub fn stop_comment(&self) -> Option<&str> {
        self.stop_comment.as_deref()
    }

    pub fn duration(&self) -> TimeDelta {
        self.duration
    }
}

/// One row of a per-project time summary: total seconds worked per user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserTotal {
    pub username: String,
    pub total_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn completed_session_duration_invariant() {
        let session = Session::new(Username("@alice".into()), ts(1_000), None, None);
        let completed = CompletedSession::new(session, ts(4_600), Some("done".into()));
        assert_eq!(
            completed.duration(),
            completed.stop() - completed.session().start
        );
        assert_eq!(completed.duration(), TimeDelta::seconds(3_600));
    }

    #[test]
    fn completed_session_zero_duration() {
        let session = Session::new(Username("@alice".into()), ts(42), None, None);
        let completed = CompletedSession::new(session, ts(42), None);
        assert_eq!(completed.duration(), TimeDelta::zero());
    }

    #[test]
    fn truncate_selection_short_key_unchanged() {
        assert_eq!(truncate_selection("poulet"), "poulet");
    }

    #[test]
    fn truncate_selection_caps_at_budget() {
        let long = "x".repeat(200);
        let truncated = truncate_selection(&long);
        assert_eq!(truncated.len(), SELECTION_MAX_BYTES);
        assert!(long.starts_with(&truncated));
    }

    #[test]
    fn truncate_selection_respects_utf8_boundaries() {
        // 2-byte characters: 40 of them is 80 bytes, so some must go.
        let long = "é".repeat(40);
        let truncated = truncate_selection(&long);
        assert!(truncated.len() <= SELECTION_MAX_BYTES);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn menu_from_keys_truncates_data_but_not_labels() {
        let long = "a".repeat(100);
        let menu = Menu::from_keys([long.as_str(), "short"]);
        assert_eq!(menu.buttons.len(), 2);
        assert_eq!(menu.buttons[0].label, long);
        assert_eq!(menu.buttons[0].data.len(), SELECTION_MAX_BYTES);
        assert_eq!(menu.buttons[1].data, "short");
    }

    #[test]
    fn username_displays_raw_handle() {
        assert_eq!(Username("@bob".into()).to_string(), "@bob");
    }
}
