// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Tempo time-tracking bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for messages and menu callbacks, inline-keyboard menus,
//! message deletion, and task-catalog document downloads.

pub mod handler;

use async_trait::async_trait;
use teloxide::dptree;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, CallbackQueryId, Document};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tempo_config::model::TelegramConfig;
use tempo_core::error::TempoError;
use tempo_core::traits::{ChannelAdapter, PluginAdapter};
use tempo_core::types::{
    AdapterType, ChannelCapabilities, ChatId, EventPayload, HealthStatus, InboundEvent, Menu,
    MessageId, OutboundMessage,
};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling and forwards classified updates through an
/// internal queue drained by [`ChannelAdapter::receive`].
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, TempoError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            TempoError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(TempoError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn channel_err(
    message: impl Into<String>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> TempoError {
    TempoError::Channel {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

fn tg_chat_id(chat: &ChatId) -> Result<teloxide::types::ChatId, TempoError> {
    chat.0
        .parse::<i64>()
        .map(teloxide::types::ChatId)
        .map_err(|e| TempoError::Channel {
            message: format!("invalid chat id {:?}: {e}", chat.0),
            source: None,
        })
}

fn tg_message_id(message: &MessageId) -> Result<teloxide::types::MessageId, TempoError> {
    message
        .0
        .parse::<i32>()
        .map(teloxide::types::MessageId)
        .map_err(|e| TempoError::Channel {
            message: format!("invalid message id {:?}: {e}", message.0),
            source: None,
        })
}

/// Downloads a document from Telegram servers.
///
/// Uses the Bot API's `getFile` to resolve the file path, then fetches
/// the content as bytes.
async fn download_document(bot: &Bot, doc: &Document) -> Result<Vec<u8>, TempoError> {
    let file = bot
        .get_file(doc.file.id.clone())
        .await
        .map_err(|e| channel_err("failed to get file info", e))?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| channel_err("failed to download file", e))?;

    debug!(file_id = %doc.file.id, size = buf.len(), "downloaded document from Telegram");
    Ok(buf)
}

/// Classifies a message into an event payload.
///
/// Text becomes a command or free text; documents are downloaded and must
/// decode as UTF-8. Everything else (stickers, photos, voice) is ignored.
async fn extract_payload(bot: &Bot, msg: &Message) -> Result<Option<EventPayload>, TempoError> {
    if let Some(text) = msg.text() {
        return Ok(Some(handler::parse_payload(text)));
    }

    if let Some(doc) = msg.document() {
        let bytes = download_document(bot, doc).await?;
        return match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(EventPayload::Document { content })),
            Err(_) => {
                debug!(msg_id = msg.id.0, "ignoring non-text document");
                Ok(None)
            }
        };
    }

    Ok(None)
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TempoError> {
        // Check if the bot token is valid by calling getMe.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), TempoError> {
        debug!("Telegram channel shutting down");
        // The polling handle is aborted when TelegramChannel is dropped.
        // For a clean exit the tracker loop stops calling receive() first.
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_edit: true,
            supports_menus: true,
            supports_documents: true,
            max_message_length: Some(4096),
        }
    }

    async fn connect(&mut self) -> Result<(), TempoError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let tx_messages = self.inbound_tx.clone();
        let tx_callbacks = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_branch =
                Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                    let tx = tx_messages.clone();
                    async move {
                        match extract_payload(&bot, &msg).await {
                            Ok(Some(payload)) => {
                                let event = handler::message_event(&msg, payload);
                                if tx.send(event).await.is_err() {
                                    warn!("inbound queue closed, dropping update");
                                }
                            }
                            Ok(None) => {
                                debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                            }
                            Err(e) => {
                                error!(error = %e, "failed to extract message payload");
                            }
                        }
                        respond(())
                    }
                });

            let callback_branch =
                Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                    let tx = tx_callbacks.clone();
                    async move {
                        match handler::callback_event(&query) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("inbound queue closed, dropping callback");
                                }
                            }
                            None => debug!("ignoring callback without data or menu message"),
                        }
                        respond(())
                    }
                });

            Dispatcher::builder(
                bot,
                dptree::entry()
                    .branch(message_branch)
                    .branch(callback_branch),
            )
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .build()
            .dispatch()
            .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, message: OutboundMessage) -> Result<MessageId, TempoError> {
        let chat_id = tg_chat_id(&message.chat)?;
        let request = self.bot.send_message(chat_id, &message.text);
        let request = match &message.menu {
            Some(menu) => request.reply_markup(handler::to_inline_keyboard(menu)),
            None => request,
        };

        let sent = request
            .await
            .map_err(|e| channel_err("failed to send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn edit_menu(
        &self,
        chat: &ChatId,
        message: &MessageId,
        menu: Menu,
    ) -> Result<(), TempoError> {
        let chat_id = tg_chat_id(chat)?;
        let message_id = tg_message_id(message)?;

        let result = self
            .bot
            .edit_message_reply_markup(chat_id, message_id)
            .reply_markup(handler::to_inline_keyboard(&menu))
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(channel_err("failed to edit menu", e)),
        }
    }

    async fn try_delete(&self, chat: &ChatId, message: &MessageId) -> Result<bool, TempoError> {
        let chat_id = tg_chat_id(chat)?;
        let message_id = tg_message_id(message)?;

        match self.bot.delete_message(chat_id, message_id).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let reason = e.to_string();
                // Missing permission is an expected answer, not a failure.
                if reason.contains("can't be deleted")
                    || reason.contains("not enough rights")
                    || reason.contains("message to delete not found")
                {
                    debug!(chat_id = chat_id.0, "deletion not permitted: {reason}");
                    Ok(false)
                } else {
                    Err(channel_err("failed to delete message", e))
                }
            }
        }
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), TempoError> {
        let request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        let request = match text {
            Some(text) => request.text(text),
            None => request,
        };
        request
            .await
            .map_err(|e| channel_err("failed to answer callback", e))?;
        Ok(())
    }

    async fn receive(&self) -> Option<InboundEvent> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await
    }
}
