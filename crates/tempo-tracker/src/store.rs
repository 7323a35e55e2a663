// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory ledger of in-progress sessions.
//!
//! Sessions live here from start to stop; only sealed sessions reach
//! storage. The ledger is keyed by chat name, then username, so one user
//! can hold independent sessions in different chats.

use std::collections::HashMap;

use tempo_core::types::{Session, Username};

/// All in-progress sessions, per chat.
#[derive(Debug, Default)]
pub struct SessionLedger {
    chats: HashMap<String, HashMap<Username, Session>>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user currently has a session in this chat.
    pub fn is_working(&self, chat: &str, user: &Username) -> bool {
        self.chats
            .get(chat)
            .is_some_and(|workers| workers.contains_key(user))
    }

    /// Record a started session.
    ///
    /// Returns the previous session if one was silently replaced; callers
    /// should check [`is_working`](Self::is_working) first and reject
    /// instead of replacing.
    pub fn insert(&mut self, chat: &str, session: Session) -> Option<Session> {
        self.chats
            .entry(chat.to_string())
            .or_default()
            .insert(session.author.clone(), session)
    }

    /// Remove and return the user's session, if any.
    pub fn remove(&mut self, chat: &str, user: &Username) -> Option<Session> {
        self.chats.get_mut(chat)?.remove(user)
    }

    /// Whether this chat has ever been touched by a session start.
    pub fn knows_chat(&self, chat: &str) -> bool {
        self.chats.contains_key(chat)
    }

    /// Mark a chat as monitored even before its first session.
    pub fn touch_chat(&mut self, chat: &str) {
        self.chats.entry(chat.to_string()).or_default();
    }

    /// Current workers of a chat; iteration order is not guaranteed.
    pub fn workers(&self, chat: &str) -> Vec<&Session> {
        self.chats
            .get(chat)
            .map(|workers| workers.values().collect())
            .unwrap_or_default()
    }
}
