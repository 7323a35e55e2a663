// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session lifecycle controller.
//!
//! [`SessionTracker`] owns the in-memory state (session ledger and dialogue
//! registry) and drives every transition from inbound chat events. It talks
//! to the outside world only through the [`ChannelAdapter`] and
//! [`StorageAdapter`] traits, so tests can run it against mocks.
//!
//! Every command that opens a dialogue is gated on message deletion: if the
//! bot cannot delete the triggering message it asks for the permission and
//! refuses to proceed, keeping the chat history free of half-finished
//! command noise.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tempo_core::catalog::CatalogNode;
use tempo_core::types::{
    Chat, CompletedSession, EventPayload, InboundEvent, Menu, MessageId, OutboundMessage, Session,
    Username,
};
use tempo_core::{ChannelAdapter, StorageAdapter, TempoError};

use crate::dialogue::{DialogueRegistry, DialogueStep, LifecycleState};
use crate::format;
use crate::store::SessionLedger;

/// Drives the session lifecycle for all chats on one transport.
pub struct SessionTracker {
    transport: Arc<dyn ChannelAdapter>,
    storage: Arc<dyn StorageAdapter>,
    ledger: SessionLedger,
    dialogues: DialogueRegistry,
}

impl SessionTracker {
    pub fn new(transport: Arc<dyn ChannelAdapter>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            transport,
            storage,
            ledger: SessionLedger::new(),
            dialogues: DialogueRegistry::new(),
        }
    }

    /// Observable lifecycle state of a user, mostly for diagnostics and tests.
    pub fn state_of(&self, chat: &str, user: &Username) -> LifecycleState {
        self.dialogues.state_of(&self.ledger, chat, user)
    }

    /// Consume inbound events until the channel closes or shutdown fires.
    ///
    /// Event failures are logged and the loop keeps going; one bad update
    /// must not take the bot down.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<(), TempoError> {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("shutdown requested, tracker loop stopping");
                    return Ok(());
                }
                event = self.transport.receive() => {
                    match event {
                        Some(event) => {
                            if let Err(e) = self.handle_event(event).await {
                                warn!(error = %e, "event handling failed");
                            }
                        }
                        None => {
                            info!("channel closed, tracker loop stopping");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Apply one inbound event to the state machine.
    pub async fn handle_event(&mut self, event: InboundEvent) -> Result<(), TempoError> {
        let InboundEvent {
            chat,
            username,
            timestamp,
            message_id,
            payload,
        } = event;

        match payload {
            EventPayload::Command(command) => {
                use tempo_core::types::Command;
                match command {
                    Command::Start => self.on_start(&chat, &username, &message_id).await,
                    Command::Stop => self.on_stop(&chat, &username, &message_id).await,
                    Command::LoadTasks => self.on_load_tasks(&chat, &username, &message_id).await,
                    Command::DataMenu => self.on_data_menu(&chat, &username, &message_id).await,
                }
            }
            EventPayload::UnknownCommand => {
                self.send_text(&chat, format::UNKNOWN_COMMAND).await?;
                Ok(())
            }
            EventPayload::Callback { callback_id, data } => {
                self.on_callback(&chat, &username, timestamp, &callback_id, &data, &message_id)
                    .await
            }
            EventPayload::Text(text) => {
                self.on_text(&chat, &username, timestamp, &message_id, text)
                    .await
            }
            EventPayload::Document { content } => {
                self.on_document(&chat, &username, &message_id, content)
                    .await
            }
        }
    }

    // --- Command handlers ---

    async fn on_start(
        &mut self,
        chat: &Chat,
        user: &Username,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if !self.delete_gate(chat, message_id).await? {
            return Ok(());
        }
        self.ledger.touch_chat(&chat.name);

        if self.ledger.is_working(&chat.name, user) {
            self.send_text(chat, format::already_working(user)).await?;
            return Ok(());
        }

        match self.storage.task_catalog(&chat.name).await? {
            Some(catalog) => {
                let menu = Menu::from_keys(catalog.keys());
                self.transport
                    .send(OutboundMessage::with_menu(&chat.id, format::CHOOSE_TASK, menu))
                    .await?;
                self.dialogues
                    .set(&chat.name, user, DialogueStep::ChoosingTask { cursor: catalog });
            }
            None => {
                self.send_text(chat, format::start_comment_prompt(user))
                    .await?;
                self.dialogues
                    .set(&chat.name, user, DialogueStep::AwaitingStartComment { task: None });
            }
        }
        Ok(())
    }

    async fn on_stop(
        &mut self,
        chat: &Chat,
        user: &Username,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if !self.delete_gate(chat, message_id).await? {
            return Ok(());
        }

        if self.ledger.is_working(&chat.name, user) {
            self.send_text(chat, format::stop_comment_prompt(user))
                .await?;
            self.dialogues
                .set(&chat.name, user, DialogueStep::AwaitingStopComment);
        } else {
            debug!(chat = %chat.name, user = %user, "stop without an active session, ignored");
        }
        Ok(())
    }

    async fn on_load_tasks(
        &mut self,
        chat: &Chat,
        user: &Username,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if !self.delete_gate(chat, message_id).await? {
            return Ok(());
        }
        self.dialogues
            .set(&chat.name, user, DialogueStep::AwaitingCatalog);
        self.send_text(chat, format::catalog_prompt(user)).await?;
        Ok(())
    }

    async fn on_data_menu(
        &mut self,
        chat: &Chat,
        user: &Username,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if !self.delete_gate(chat, message_id).await? {
            return Ok(());
        }
        let menu = Menu::from_keys([format::ISWORKING, format::SUMMARY]);
        self.transport
            .send(OutboundMessage::with_menu(
                &chat.id,
                format::data_menu_prompt(user),
                menu,
            ))
            .await?;
        Ok(())
    }

    // --- Dialogue continuations ---

    async fn on_text(
        &mut self,
        chat: &Chat,
        user: &Username,
        timestamp: chrono::DateTime<chrono::Utc>,
        message_id: &MessageId,
        text: String,
    ) -> Result<(), TempoError> {
        match self.dialogues.take(&chat.name, user) {
            Some(DialogueStep::AwaitingStartComment { task }) => {
                let session = Session::new(user.clone(), timestamp, Some(text), task);
                let notification = format::start_message(&session);
                self.ledger.insert(&chat.name, session);

                self.delete_quietly(chat, message_id).await;
                self.send_text(chat, &notification).await?;
                info!(chat = %chat.name, "{notification}");
                Ok(())
            }
            Some(DialogueStep::AwaitingStopComment) => {
                let Some(session) = self.ledger.remove(&chat.name, user) else {
                    warn!(chat = %chat.name, user = %user, "stop comment without a session");
                    return Ok(());
                };
                let completed = CompletedSession::new(session, timestamp, Some(text));
                self.storage
                    .append_completed_session(&chat.name, &completed)
                    .await?;

                let notification = format::stop_message(&completed);
                self.delete_quietly(chat, message_id).await;
                self.send_text(chat, &notification).await?;
                info!(chat = %chat.name, "{notification}");
                Ok(())
            }
            Some(step) => {
                // Free text is not part of this dialogue; keep waiting.
                self.dialogues.set(&chat.name, user, step);
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn on_callback(
        &mut self,
        chat: &Chat,
        user: &Username,
        timestamp: chrono::DateTime<chrono::Utc>,
        callback_id: &str,
        data: &str,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if data == format::ISWORKING {
            return self
                .on_is_working(chat, timestamp, callback_id, message_id)
                .await;
        }
        if data == format::SUMMARY {
            return self.on_summary(chat, callback_id, message_id).await;
        }

        if let Some(DialogueStep::ChoosingTask { cursor }) =
            self.dialogues.get(&chat.name, user).cloned()
        {
            self.on_task_selection(chat, user, &cursor, callback_id, data, message_id)
                .await
        } else {
            // Stale callback from a dead menu; just clear the spinner.
            self.transport.answer_callback(callback_id, None).await
        }
    }

    async fn on_task_selection(
        &mut self,
        chat: &Chat,
        user: &Username,
        cursor: &CatalogNode,
        callback_id: &str,
        data: &str,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        // Resolution happens before any state change; a miss leaves the
        // dialogue exactly where it was.
        let (next, full_key) = match cursor.descend(data) {
            Ok(found) => found,
            Err(e) => {
                warn!(chat = %chat.name, user = %user, key = data, "task selection not in catalog");
                self.transport.answer_callback(callback_id, None).await?;
                return Err(e);
            }
        };

        if next.is_leaf() {
            self.dialogues.set(
                &chat.name,
                user,
                DialogueStep::AwaitingStartComment {
                    task: Some(full_key.to_string()),
                },
            );
            self.transport
                .answer_callback(callback_id, Some(&format::start_comment_prompt(user)))
                .await?;
            self.delete_quietly(chat, message_id).await;
        } else {
            let menu = Menu::from_keys(next.keys());
            self.transport.edit_menu(&chat.id, message_id, menu).await?;
            self.transport.answer_callback(callback_id, None).await?;
            self.dialogues.set(
                &chat.name,
                user,
                DialogueStep::ChoosingTask {
                    cursor: next.clone(),
                },
            );
        }
        Ok(())
    }

    async fn on_is_working(
        &mut self,
        chat: &Chat,
        timestamp: chrono::DateTime<chrono::Utc>,
        callback_id: &str,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        if !self.ledger.knows_chat(&chat.name) {
            self.transport
                .answer_callback(callback_id, Some(format::NO_ONE_EVER_WORKED))
                .await?;
        } else {
            let workers = self.ledger.workers(&chat.name);
            if workers.is_empty() {
                self.transport
                    .answer_callback(callback_id, Some(format::NO_ONE_WORKING))
                    .await?;
            } else {
                let report = format::working_report(timestamp, &workers);
                self.send_text(chat, report).await?;
                self.transport.answer_callback(callback_id, None).await?;
            }
        }
        self.delete_quietly(chat, message_id).await;
        Ok(())
    }

    async fn on_summary(
        &mut self,
        chat: &Chat,
        callback_id: &str,
        message_id: &MessageId,
    ) -> Result<(), TempoError> {
        let totals = self.storage.summary(&chat.name).await?;
        self.send_text(chat, format::summary_report(&totals))
            .await?;
        self.transport.answer_callback(callback_id, None).await?;
        self.delete_quietly(chat, message_id).await;
        Ok(())
    }

    async fn on_document(
        &mut self,
        chat: &Chat,
        user: &Username,
        message_id: &MessageId,
        content: String,
    ) -> Result<(), TempoError> {
        if self.dialogues.get(&chat.name, user) != Some(&DialogueStep::AwaitingCatalog) {
            return Ok(());
        }
        self.dialogues.take(&chat.name, user);

        let catalog = match CatalogNode::from_toml_str(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(chat = %chat.name, error = %e, "rejected task catalog upload");
                self.send_text(chat, format::INVALID_CATALOG).await?;
                return Ok(());
            }
        };

        self.storage
            .replace_task_catalog(&chat.name, &content, &catalog)
            .await?;
        self.delete_quietly(chat, message_id).await;
        self.send_text(chat, format::catalog_updated(user)).await?;
        info!(chat = %chat.name, user = %user, tasks = catalog.leaves().len(), "task catalog updated");
        Ok(())
    }

    // --- Transport helpers ---

    async fn send_text(&self, chat: &Chat, text: impl Into<String>) -> Result<(), TempoError> {
        self.transport
            .send(OutboundMessage::text(&chat.id, text))
            .await?;
        Ok(())
    }

    /// Delete the triggering message, asking for permission when denied.
    ///
    /// Returns `false` when the command should not proceed.
    async fn delete_gate(&self, chat: &Chat, message_id: &MessageId) -> Result<bool, TempoError> {
        if self.transport.try_delete(&chat.id, message_id).await? {
            return Ok(true);
        }
        self.send_text(chat, format::ALLOW_DELETE_PROMPT).await?;
        Ok(false)
    }

    /// Delete a message without gating; failures are logged and ignored.
    async fn delete_quietly(&self, chat: &Chat, message_id: &MessageId) {
        match self.transport.try_delete(&chat.id, message_id).await {
            Ok(true) => {}
            Ok(false) => debug!(chat = %chat.name, "message deletion not permitted"),
            Err(e) => warn!(chat = %chat.name, error = %e, "message deletion failed"),
        }
    }
}
