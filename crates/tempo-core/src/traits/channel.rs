// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait.

use async_trait::async_trait;

use crate::error::TempoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, ChatId, InboundEvent, Menu, MessageId, OutboundMessage};

/// A messaging transport the bot talks through.
///
/// Implementations own their network connection and surface updates through
/// [`receive`](ChannelAdapter::receive). The lifecycle controller is the
/// only consumer; it calls `receive` from a single task.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Static description of what this transport can do.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establish the connection and start delivering updates.
    async fn connect(&mut self) -> Result<(), TempoError>;

    /// Send a message, returning the transport's id for it.
    async fn send(&self, message: OutboundMessage) -> Result<MessageId, TempoError>;

    /// Replace the menu attached to a previously sent message.
    async fn edit_menu(
        &self,
        chat: &ChatId,
        message: &MessageId,
        menu: Menu,
    ) -> Result<(), TempoError>;

    /// Delete a message if the transport permits it.
    ///
    /// Returns `Ok(false)` when the bot lacks deletion rights in this chat;
    /// an `Err` means the transport call itself failed.
    async fn try_delete(&self, chat: &ChatId, message: &MessageId) -> Result<bool, TempoError>;

    /// Acknowledge a callback so the client stops showing a spinner.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TempoError>;

    /// Wait for the next inbound event. Returns `None` once the channel has
    /// shut down and the queue is drained.
    async fn receive(&self) -> Option<InboundEvent>;
}
