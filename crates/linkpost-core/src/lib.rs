// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the linkpost workspace.
//!
//! Provides the foundational trait definitions, error type, and domain types
//! used throughout the workspace. The lifecycle engine depends only on this
//! crate's traits; concrete collaborators live in their own crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LinkpostError;
pub use traits::{ChatSender, ContentStore, PagePublisher, Scraper};
pub use types::{
    Administrator, ContentItem, InboundUpdate, InlineButton, InlineKeyboard, ItemMeta,
    ItemStatus, ScrapedContent,
};
