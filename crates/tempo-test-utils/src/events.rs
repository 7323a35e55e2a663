// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for inbound event fixtures.
//!
//! Timestamps are explicit so tests can assert exact durations; message ids
//! are unique per event.

use chrono::{DateTime, Utc};

use tempo_core::types::{
    Chat, ChatId, Command, EventPayload, InboundEvent, MessageId, Username,
};

/// A chat whose transport id and project name are both `name`.
pub fn chat(name: &str) -> Chat {
    Chat {
        id: ChatId(name.to_string()),
        name: name.to_string(),
    }
}

/// Epoch-based timestamp for deterministic duration math.
pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp in range")
}

fn event(chat: &Chat, user: &str, timestamp: DateTime<Utc>, payload: EventPayload) -> InboundEvent {
    InboundEvent {
        chat: chat.clone(),
        username: Username(user.to_string()),
        timestamp,
        message_id: MessageId(format!("msg-{}", uuid::Uuid::new_v4())),
        payload,
    }
}

pub fn command_event(
    chat: &Chat,
    user: &str,
    timestamp: DateTime<Utc>,
    command: Command,
) -> InboundEvent {
    event(chat, user, timestamp, EventPayload::Command(command))
}

pub fn unknown_command_event(chat: &Chat, user: &str, timestamp: DateTime<Utc>) -> InboundEvent {
    event(chat, user, timestamp, EventPayload::UnknownCommand)
}

pub fn text_event(chat: &Chat, user: &str, timestamp: DateTime<Utc>, text: &str) -> InboundEvent {
    event(chat, user, timestamp, EventPayload::Text(text.to_string()))
}

/// A callback press on the menu message `menu_message`.
pub fn callback_event(
    chat: &Chat,
    user: &str,
    timestamp: DateTime<Utc>,
    menu_message: &MessageId,
    data: &str,
) -> InboundEvent {
    InboundEvent {
        chat: chat.clone(),
        username: Username(user.to_string()),
        timestamp,
        message_id: menu_message.clone(),
        payload: EventPayload::Callback {
            callback_id: format!("cb-{}", uuid::Uuid::new_v4()),
            data: data.to_string(),
        },
    }
}

pub fn document_event(
    chat: &Chat,
    user: &str,
    timestamp: DateTime<Utc>,
    content: &str,
) -> InboundEvent {
    event(
        chat,
        user,
        timestamp,
        EventPayload::Document {
            content: content.to_string(),
        },
    )
}
