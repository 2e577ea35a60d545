// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the linkpost workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a tracked content item.
///
/// Reachable transitions:
///
/// ```text
/// New -> Processing -> Parsed -> Confirmed -> Sent
///          |              |
///          v              v
///        Error        Cancelled
/// ```
///
/// `Sent`, `Cancelled`, and `Error` are terminal; an errored item re-enters
/// the lifecycle only through a fresh submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    New,
    Processing,
    Parsed,
    Confirmed,
    Cancelled,
    Sent,
    Error,
}

impl ItemStatus {
    /// Whether the status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ItemStatus::Sent | ItemStatus::Cancelled | ItemStatus::Error
        )
    }
}

/// A submitted content item tracked through the lifecycle state machine.
///
/// Timestamps are RFC 3339 UTC strings with millisecond precision, matching
/// the storage format, so they order lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    /// Unique source URL; the deduplication key.
    pub source_url: String,
    pub name: String,
    pub series: String,
    pub author: String,
    pub translator: String,
    pub tags: Vec<String>,
    /// URL of the generated published page; empty until enrichment succeeds.
    pub page_url: String,
    pub status: ItemStatus,
    /// Free-text diagnostic; cleared on successful transitions.
    pub last_error: String,
    pub scheduled_at: Option<String>,
    pub review_sent_at: Option<String>,
    pub sent_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Enrichment fields merged into an item after a successful scrape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMeta {
    pub name: String,
    pub series: String,
    pub author: String,
    pub translator: String,
    pub tags: Vec<String>,
}

/// A registered administrator, provisioned out of band and read-only
/// from the engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Administrator {
    pub user_id: i64,
    pub display_name: String,
    pub created_at: String,
}

/// The result of scraping a source page pair.
///
/// A scrape is considered successful only with a non-empty title and at
/// least one image URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedContent {
    pub title: String,
    pub series: String,
    pub author: String,
    pub translator: String,
    pub tags: Vec<String>,
    /// Ordered image URLs forming the published page body.
    pub image_urls: Vec<String>,
}

impl ScrapedContent {
    /// The enrichment fields stored on the item (everything but the images).
    pub fn meta(&self) -> ItemMeta {
        ItemMeta {
            name: self.title.clone(),
            series: self.series.clone(),
            author: self.author.clone(),
            translator: self.translator.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// A chat-platform update routed into the interaction handler.
///
/// Only the fields the engine reads are carried; everything else about the
/// wire schema stays inside the chat client crate.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundUpdate {
    /// A text message (commands included) from a user chat.
    Message {
        chat_id: i64,
        user_id: i64,
        text: String,
    },
    /// An inline-button press carrying an opaque callback payload.
    Callback {
        chat_id: i64,
        user_id: i64,
        data: String,
    },
}

/// One inline button with a callback payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of inline buttons attached to an outbound message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// A single-row keyboard, the common case for accept/reject prompts.
    pub fn single_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }
}
