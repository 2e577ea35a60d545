// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram chat-platform client for linkpost.
//!
//! Implements the engine's [`ChatSender`] trait over teloxide and provides
//! the long-polling [`TelegramPoller`](poller::TelegramPoller) update source.
//! All outbound messages use HTML parse mode; rendering and escaping happen
//! upstream in the engine.

pub mod convert;
pub mod poller;

use async_trait::async_trait;
use linkpost_core::types::InlineKeyboard;
use linkpost_core::{ChatSender, LinkpostError};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, ParseMode, Recipient,
};
use tracing::debug;

pub use poller::TelegramPoller;

/// Outbound message sender over the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Build a sender (and its underlying bot) from a token.
    pub fn from_token(token: &str) -> Self {
        Self { bot: Bot::new(token) }
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn preview_options(preview_url: &str, large: bool, above: bool) -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: false,
        url: url::Url::parse(preview_url).ok().map(|u| u.to_string()),
        prefer_small_media: false,
        prefer_large_media: large,
        show_above_text: above,
    }
}

fn to_markup(keyboard: InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.into_iter().map(|row| {
        row.into_iter()
            .map(|b| InlineKeyboardButton::callback(b.text, b.callback_data))
    }))
}

fn map_request_err(e: teloxide::RequestError) -> LinkpostError {
    match e {
        teloxide::RequestError::Api(api) => LinkpostError::UpstreamApi {
            message: format!("telegram API: {api}"),
        },
        other => LinkpostError::Network {
            message: format!("telegram request: {other}"),
            source: Some(Box::new(other)),
        },
    }
}

#[async_trait]
impl ChatSender for TelegramSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LinkpostError> {
        self.bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(map_request_err)?;
        debug!(chat_id, "message sent");
        Ok(())
    }

    async fn send_with_preview(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        large: bool,
        above: bool,
    ) -> Result<(), LinkpostError> {
        self.bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(preview_options(preview_url, large, above))
            .await
            .map_err(map_request_err)?;
        debug!(chat_id, preview_url, "message with preview sent");
        Ok(())
    }

    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        large: bool,
        above: bool,
        keyboard: InlineKeyboard,
    ) -> Result<(), LinkpostError> {
        self.bot
            .send_message(Recipient::Id(ChatId(chat_id)), text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(preview_options(preview_url, large, above))
            .reply_markup(to_markup(keyboard))
            .await
            .map_err(map_request_err)?;
        debug!(chat_id, preview_url, "message with keyboard sent");
        Ok(())
    }
}
