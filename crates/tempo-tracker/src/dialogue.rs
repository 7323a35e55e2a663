// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending-dialogue registry and the observable lifecycle states.
//!
//! A dialogue step records what the bot is waiting for from one user in one
//! chat: a task selection, a start comment, a stop comment, or a catalog
//! upload. Steps are keyed per (chat, user) so concurrent dialogues in the
//! same chat never interfere.

use std::collections::HashMap;

use tempo_core::catalog::CatalogNode;
use tempo_core::types::Username;

use crate::store::SessionLedger;

/// What the bot is currently waiting for from a user.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueStep {
    /// Navigating the task catalog; `cursor` is the branch whose children
    /// are on the current menu.
    ChoosingTask { cursor: CatalogNode },
    /// Waiting for the free-text start comment, task already chosen (or
    /// skipped when the chat has no catalog).
    AwaitingStartComment { task: Option<String> },
    /// Waiting for the free-text stop comment.
    AwaitingStopComment,
    /// Waiting for a task-catalog document upload.
    AwaitingCatalog,
}

/// Observable state of one user in one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No session and no pending dialogue.
    Idle,
    /// A task menu is open for this user.
    ChoosingTask,
    /// Start comment prompt is outstanding.
    AwaitingStartComment,
    /// A session is running.
    Working,
    /// Stop comment prompt is outstanding.
    AwaitingStopComment,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Idle => write!(f, "idle"),
            LifecycleState::ChoosingTask => write!(f, "choosing_task"),
            LifecycleState::AwaitingStartComment => write!(f, "awaiting_start_comment"),
            LifecycleState::Working => write!(f, "working"),
            LifecycleState::AwaitingStopComment => write!(f, "awaiting_stop_comment"),
        }
    }
}

/// Pending dialogue steps, keyed per (chat, user).
#[derive(Debug, Default)]
pub struct DialogueRegistry {
    steps: HashMap<(String, Username), DialogueStep>,
}

impl DialogueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the pending step for a user.
    pub fn set(&mut self, chat: &str, user: &Username, step: DialogueStep) {
        self.steps.insert((chat.to_string(), user.clone()), step);
    }

    /// Peek at the pending step without consuming it.
    pub fn get(&self, chat: &str, user: &Username) -> Option<&DialogueStep> {
        self.steps.get(&(chat.to_string(), user.clone()))
    }

    /// Remove and return the pending step.
    pub fn take(&mut self, chat: &str, user: &Username) -> Option<DialogueStep> {
        self.steps.remove(&(chat.to_string(), user.clone()))
    }

    /// Derive the observable lifecycle state of a user.
    ///
    /// `Working` comes from the session ledger; the dialogue steps map to
    /// the remaining non-idle states. A pending step shadows `Working`
    /// only for the stop-comment prompt, which is the one step a working
    /// user can be in.
    pub fn state_of(&self, ledger: &SessionLedger, chat: &str, user: &Username) -> LifecycleState {
        match self.get(chat, user) {
            Some(DialogueStep::ChoosingTask { .. }) => LifecycleState::ChoosingTask,
            Some(DialogueStep::AwaitingStartComment { .. }) => {
                LifecycleState::AwaitingStartComment
            }
            Some(DialogueStep::AwaitingStopComment) => LifecycleState::AwaitingStopComment,
            Some(DialogueStep::AwaitingCatalog) | None => {
                if ledger.is_working(chat, user) {
                    LifecycleState::Working
                } else {
                    LifecycleState::Idle
                }
            }
        }
    }
}
