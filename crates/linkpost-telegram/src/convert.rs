// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of raw Telegram updates into the engine's [`InboundUpdate`].
//!
//! Only text messages and callback queries are carried; every other update
//! kind is dropped here so the engine never sees wire-schema details.

use linkpost_core::InboundUpdate;
use teloxide::types::{Update, UpdateKind};
use tracing::debug;

/// Map one Telegram update into an [`InboundUpdate`], or `None` when the
/// update kind is not one the engine handles.
pub fn to_inbound(update: Update) -> Option<InboundUpdate> {
    match update.kind {
        UpdateKind::Message(msg) => {
            let text = msg.text()?.to_string();
            let chat_id = msg.chat.id.0;
            // Direct chats have user id == chat id; prefer the sender when present.
            let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(chat_id);
            Some(InboundUpdate::Message {
                chat_id,
                user_id,
                text,
            })
        }
        UpdateKind::CallbackQuery(cb) => {
            let data = cb.data?;
            let user_id = cb.from.id.0 as i64;
            // Acks go back to the presser's direct chat.
            Some(InboundUpdate::Callback {
                chat_id: user_id,
                user_id,
                data,
            })
        }
        other => {
            debug!(kind = ?other, "ignoring unsupported update kind");
            None
        }
    }
}
