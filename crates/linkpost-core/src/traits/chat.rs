// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound chat-platform trait.

use async_trait::async_trait;

use crate::error::LinkpostError;
use crate::types::InlineKeyboard;

/// Sends messages to a chat-platform destination (user chat or channel).
///
/// Text is HTML-formatted; rendering and escaping are the caller's job.
/// `large`/`above` control the link-preview size and placement relative to
/// the message text.
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Plain text message, no link preview.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LinkpostError>;

    /// Message with an explicit link preview.
    async fn send_with_preview(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        large: bool,
        above: bool,
    ) -> Result<(), LinkpostError>;

    /// Message with a link preview and an inline keyboard.
    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        large: bool,
        above: bool,
        keyboard: InlineKeyboard,
    ) -> Result<(), LinkpostError>;
}
