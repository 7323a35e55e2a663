// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle tracking for the Tempo time-tracking bot.
//!
//! The [`SessionTracker`] is the central coordinator that:
//! - Receives events from a channel adapter
//! - Drives per-user start/stop dialogues and task-catalog navigation
//! - Seals completed sessions into the storage adapter
//! - Renders the chat-facing notifications and reports
//! - Handles graceful shutdown

pub mod controller;
pub mod dialogue;
pub mod format;
pub mod shutdown;
pub mod store;

pub use controller::SessionTracker;
pub use dialogue::{DialogueRegistry, DialogueStep, LifecycleState};
pub use shutdown::install_signal_handler;
pub use store::SessionLedger;
