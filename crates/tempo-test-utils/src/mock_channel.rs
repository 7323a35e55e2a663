// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound traffic for assertion in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use tokio::sync::{Mutex, Notify};

use tempo_core::traits::adapter::PluginAdapter;
use tempo_core::traits::channel::ChannelAdapter;
use tempo_core::types::{
    AdapterType, ChannelCapabilities, ChatId, HealthStatus, InboundEvent, Menu, MessageId,
    OutboundMessage,
};
use tempo_core::TempoError;

/// A mock messaging channel for testing.
///
/// Inbound events injected via `inject_event()` come back out of
/// `receive()`; everything the controller does on the transport (sends,
/// menu edits, deletions, callback answers) is captured for assertion.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    edits: Arc<Mutex<Vec<(ChatId, MessageId, Menu)>>>,
    deleted: Arc<Mutex<Vec<(ChatId, MessageId)>>>,
    answers: Arc<Mutex<Vec<(String, Option<String>)>>>,
    delete_allowed: AtomicBool,
    closed: AtomicBool,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues and deletion allowed.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(Vec::new())),
            delete_allowed: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Make `try_delete` report missing permission from now on.
    pub fn deny_deletion(&self) {
        self.delete_allowed.store(false, Ordering::SeqCst);
    }

    /// Inject an inbound event into the receive queue.
    ///
    /// The next call to `receive()` will return this event.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Close the channel; `receive()` returns `None` once the queue drains.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts of all sent messages, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.text.clone()).collect()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// All menu edits, as (chat, message, menu) triples.
    pub async fn menu_edits(&self) -> Vec<(ChatId, MessageId, Menu)> {
        self.edits.lock().await.clone()
    }

    /// All deletion attempts that were permitted.
    pub async fn deleted_messages(&self) -> Vec<(ChatId, MessageId)> {
        self.deleted.lock().await.clone()
    }

    /// All callback answers, as (callback id, optional text) pairs.
    pub async fn callback_answers(&self) -> Vec<(String, Option<String>)> {
        self.answers.lock().await.clone()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TempoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TempoError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_edit: true,
            supports_menus: true,
            supports_documents: true,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), TempoError> {
        Ok(())
    }

    async fn send(&self, message: OutboundMessage) -> Result<MessageId, TempoError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(message);
        Ok(MessageId(id))
    }

    async fn edit_menu(
        &self,
        chat: &ChatId,
        message: &MessageId,
        menu: Menu,
    ) -> Result<(), TempoError> {
        self.edits
            .lock()
            .await
            .push((chat.clone(), message.clone(), menu));
        Ok(())
    }

    async fn try_delete(&self, chat: &ChatId, message: &MessageId) -> Result<bool, TempoError> {
        if !self.delete_allowed.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.deleted
            .lock()
            .await
            .push((chat.clone(), message.clone()));
        Ok(true)
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TempoError> {
        self.answers
            .lock()
            .await
            .push((callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }

    async fn receive(&self) -> Option<InboundEvent> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Some(event);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return None;
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;

    #[tokio::test]
    async fn receive_returns_injected_events() {
        let channel = MockChannel::new();
        let chat = events::chat("project");
        channel
            .inject_event(events::text_event(&chat, "@alice", events::ts(0), "hello"))
            .await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.username.0, "@alice");
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        let msg = OutboundMessage::text(&ChatId("42".into()), "response text");

        let msg_id = channel.send(msg).await.unwrap();
        assert!(msg_id.0.starts_with("mock-msg-"));

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "response text");
    }

    #[tokio::test]
    async fn deny_deletion_makes_try_delete_report_false() {
        let channel = MockChannel::new();
        let chat = ChatId("42".into());
        let msg = MessageId("1".into());

        assert!(channel.try_delete(&chat, &msg).await.unwrap());
        channel.deny_deletion();
        assert!(!channel.try_delete(&chat, &msg).await.unwrap());
        assert_eq!(channel.deleted_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn receive_returns_none_after_close() {
        let channel = MockChannel::new();
        let chat = events::chat("project");
        channel
            .inject_event(events::text_event(&chat, "@alice", events::ts(0), "last"))
            .await;
        channel.close();

        assert!(channel.receive().await.is_some());
        assert!(channel.receive().await.is_none());
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = Arc::new(MockChannel::new());
        let channel_clone = channel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            let chat = events::chat("project");
            channel_clone
                .inject_event(events::text_event(&chat, "@alice", events::ts(0), "delayed"))
                .await;
        });

        let received =
            tokio::time::timeout(tokio::time::Duration::from_secs(2), channel.receive())
                .await
                .expect("receive timed out")
                .unwrap();
        assert_eq!(received.username.0, "@alice");
    }
}
