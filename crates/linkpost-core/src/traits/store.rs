// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content repository trait.
//!
//! The repository is the single source of truth for item lifecycle state.
//! Every operation is a single-row or single-predicate statement; the
//! implementation must serialize [`claim_one_new`](ContentStore::claim_one_new)
//! at the storage layer so exclusivity holds across process boundaries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::LinkpostError;
use crate::types::{Administrator, ContentItem, ItemMeta};

/// Durable storage of content items and the administrator set.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a `new` item keyed by URL.
    ///
    /// Fails with [`LinkpostError::Conflict`] when the URL is already
    /// tracked; callers decide whether that is an error or a no-op.
    async fn create_if_absent(&self, source_url: &str) -> Result<ContentItem, LinkpostError>;

    async fn exists_by_url(&self, source_url: &str) -> Result<bool, LinkpostError>;

    /// Fails with [`LinkpostError::NotFound`] when the id is unknown.
    async fn get_by_id(&self, id: i64) -> Result<ContentItem, LinkpostError>;

    /// Atomically select the oldest `new` item and flip it to `processing`.
    ///
    /// Under concurrent claimants exactly one caller obtains a given item;
    /// the others observe it as no longer `new`. Returns `None` when no
    /// unclaimed work exists.
    async fn claim_one_new(&self) -> Result<Option<ContentItem>, LinkpostError>;

    /// Merge enrichment fields; leaves status untouched.
    async fn update_meta(&self, id: i64, meta: &ItemMeta) -> Result<(), LinkpostError>;

    /// `processing` -> `parsed`: store the published page URL and a draft
    /// schedule time, clear `last_error`.
    async fn mark_parsed(
        &self,
        id: i64,
        page_url: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), LinkpostError>;

    /// Record that a moderation prompt went out for this item.
    async fn mark_review_sent(&self, id: i64) -> Result<(), LinkpostError>;

    /// `parsed` -> `confirmed` with the final schedule time.
    async fn mark_confirmed(&self, id: i64, when: DateTime<Utc>) -> Result<(), LinkpostError>;

    /// `parsed` -> `cancelled`.
    async fn mark_cancelled(&self, id: i64) -> Result<(), LinkpostError>;

    /// `confirmed` -> `sent`, stamping `sent_at`.
    async fn mark_sent(&self, id: i64) -> Result<(), LinkpostError>;

    /// Any state -> `error`, recording the diagnostic message.
    async fn mark_error(&self, id: i64, message: &str) -> Result<(), LinkpostError>;

    /// `parsed` items with no review prompt sent yet, oldest first.
    async fn find_parsed_pending_review(
        &self,
        limit: u32,
    ) -> Result<Vec<ContentItem>, LinkpostError>;

    /// `confirmed` items whose schedule has elapsed, earliest first.
    async fn find_due(
        &self,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentItem>, LinkpostError>;

    /// The most recent `scheduled_at` among `confirmed` items; the anchor
    /// for computing the next publication slot.
    async fn last_scheduled_at(&self) -> Result<Option<DateTime<Utc>>, LinkpostError>;

    // --- Administrator reads (provisioning is out-of-band) ---

    async fn admin_exists(&self, user_id: i64) -> Result<bool, LinkpostError>;

    async fn admin_list(&self) -> Result<Vec<Administrator>, LinkpostError>;

    /// Upsert an administrator. Used only by the provisioning CLI, never by
    /// the engine.
    async fn admin_add(&self, user_id: i64, display_name: &str) -> Result<(), LinkpostError>;
}
