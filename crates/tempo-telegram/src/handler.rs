// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping between Telegram updates and channel-agnostic inbound events.
//!
//! Pure functions only; everything that touches the network stays in the
//! adapter. Chat names become the project key for sessions and catalogs,
//! so the naming rules here are load-bearing.

use teloxide::types::{CallbackQuery, Chat as TgChat, Message, User};

use tempo_core::types::{
    Chat, ChatId, Command, EventPayload, InboundEvent, Menu, MessageId, Username,
};

/// Classify a message text: slash commands become [`Command`]s, anything
/// else is free text feeding the pending dialogue.
///
/// Commands may carry a `@BotName` suffix in group chats; it is stripped
/// before matching.
pub fn parse_payload(text: &str) -> EventPayload {
    let Some(rest) = text.strip_prefix('/') else {
        return EventPayload::Text(text.to_string());
    };
    let command = rest.split_whitespace().next().unwrap_or("");
    let command = command.split('@').next().unwrap_or("");
    match command {
        "start" => EventPayload::Command(Command::Start),
        "stop" => EventPayload::Command(Command::Stop),
        "tasks" => EventPayload::Command(Command::LoadTasks),
        "data" => EventPayload::Command(Command::DataMenu),
        _ => EventPayload::UnknownCommand,
    }
}

/// Human-readable chat name, used as the project key.
///
/// Groups use their title; private chats fall back to the peer's name.
pub fn chat_name(chat: &TgChat) -> String {
    if let Some(title) = chat.title() {
        return title.to_string();
    }
    let first = chat.first_name().unwrap_or_default();
    match chat.last_name() {
        Some(last) => format!("{first} {last}"),
        None => first.to_string(),
    }
}

/// The author handle shown in notifications: `@username` when one exists,
/// otherwise the display name.
pub fn author_handle(user: Option<&User>) -> Username {
    match user {
        Some(user) => match &user.username {
            Some(name) => Username(format!("@{name}")),
            None => Username(user.full_name()),
        },
        None => Username("unknown".to_string()),
    }
}

fn map_chat(chat: &TgChat) -> Chat {
    Chat {
        id: ChatId(chat.id.0.to_string()),
        name: chat_name(chat),
    }
}

/// Build an inbound event from a Telegram message and its classified payload.
pub fn message_event(msg: &Message, payload: EventPayload) -> InboundEvent {
    InboundEvent {
        chat: map_chat(&msg.chat),
        username: author_handle(msg.from.as_ref()),
        timestamp: msg.date,
        message_id: MessageId(msg.id.0.to_string()),
        payload,
    }
}

/// Build an inbound event from a menu button press.
///
/// Returns `None` when the callback carries no data or its menu message is
/// no longer accessible; there is nothing to act on in either case.
pub fn callback_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let message = query.message.as_ref()?;
    let data = query.data.clone()?;
    Some(InboundEvent {
        chat: map_chat(message.chat()),
        username: author_handle(Some(&query.from)),
        timestamp: chrono::Utc::now(),
        message_id: MessageId(message.id().0.to_string()),
        payload: EventPayload::Callback {
            callback_id: query.id.to_string(),
            data,
        },
    })
}

/// Render a menu as an inline keyboard, one button per row.
pub fn to_inline_keyboard(menu: &Menu) -> teloxide::types::InlineKeyboardMarkup {
    use teloxide::types::InlineKeyboardButton;
    let rows: Vec<Vec<InlineKeyboardButton>> = menu
        .buttons
        .iter()
        .map(|b| vec![InlineKeyboardButton::callback(b.label.clone(), b.data.clone())])
        .collect();
    teloxide::types::InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock group chat message from JSON, matching Telegram Bot API structure.
    fn make_group_message(username: Option<&str>, text: &str) -> Message {
        let from = match username {
            Some(uname) => serde_json::json!({
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Alice",
                "username": uname,
            }),
            None => serde_json::json!({
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Alice",
                "last_name": "Liddell",
            }),
        };

        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Project Chat",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_private_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Alice",
                "last_name": "Liddell",
            },
            "from": {
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Alice",
                "username": "alice",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_callback(data: &str) -> CallbackQuery {
        let json = serde_json::json!({
            "id": "cb-1",
            "from": {
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Alice",
                "username": "alice",
            },
            "chat_instance": "ci-1",
            "data": data,
            "message": {
                "message_id": 42,
                "date": 1700000000i64,
                "chat": {
                    "id": -100123i64,
                    "type": "supergroup",
                    "title": "Project Chat",
                },
                "text": "Choose a task:",
            },
        });

        serde_json::from_value(json).expect("failed to deserialize mock callback query")
    }

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse_payload("/start"), EventPayload::Command(Command::Start));
        assert_eq!(parse_payload("/stop"), EventPayload::Command(Command::Stop));
        assert_eq!(parse_payload("/tasks"), EventPayload::Command(Command::LoadTasks));
        assert_eq!(parse_payload("/data"), EventPayload::Command(Command::DataMenu));
    }

    #[test]
    fn parse_command_with_bot_mention() {
        assert_eq!(
            parse_payload("/start@TempoBot"),
            EventPayload::Command(Command::Start)
        );
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(parse_payload("/frobnicate"), EventPayload::UnknownCommand);
    }

    #[test]
    fn parse_plain_text() {
        assert_eq!(
            parse_payload("writing tests"),
            EventPayload::Text("writing tests".into())
        );
    }

    #[test]
    fn group_chats_are_named_by_title() {
        let msg = make_group_message(Some("alice"), "hello");
        assert_eq!(chat_name(&msg.chat), "Project Chat");
    }

    #[test]
    fn private_chats_are_named_by_peer() {
        let msg = make_private_message("hello");
        assert_eq!(chat_name(&msg.chat), "Alice Liddell");
    }

    #[test]
    fn author_handle_prefers_username() {
        let msg = make_group_message(Some("alice"), "hello");
        assert_eq!(author_handle(msg.from.as_ref()), Username("@alice".into()));
    }

    #[test]
    fn author_handle_falls_back_to_display_name() {
        let msg = make_group_message(None, "hello");
        assert_eq!(
            author_handle(msg.from.as_ref()),
            Username("Alice Liddell".into())
        );
    }

    #[test]
    fn message_event_maps_fields() {
        let msg = make_group_message(Some("alice"), "/start");
        let event = message_event(&msg, parse_payload("/start"));

        assert_eq!(event.chat.id, ChatId("-100123".into()));
        assert_eq!(event.chat.name, "Project Chat");
        assert_eq!(event.username, Username("@alice".into()));
        assert_eq!(event.message_id, MessageId("7".into()));
        assert_eq!(event.payload, EventPayload::Command(Command::Start));
        assert_eq!(event.timestamp.timestamp(), 1700000000);
    }

    #[test]
    fn callback_event_maps_fields() {
        let query = make_callback("manger");
        let event = callback_event(&query).unwrap();

        assert_eq!(event.chat.id, ChatId("-100123".into()));
        assert_eq!(event.username, Username("@alice".into()));
        assert_eq!(event.message_id, MessageId("42".into()));
        assert_eq!(
            event.payload,
            EventPayload::Callback {
                callback_id: "cb-1".into(),
                data: "manger".into(),
            }
        );
    }

    #[test]
    fn inline_keyboard_truncates_data_but_not_labels() {
        let long = "x".repeat(80);
        let menu = Menu::from_keys([long.as_str()]);
        let keyboard = to_inline_keyboard(&menu);

        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row.len(), 1);
        assert_eq!(row[0].text, long);
    }
}
