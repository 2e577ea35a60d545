// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`ContentStore`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use linkpost_core::types::{Administrator, ContentItem, ItemMeta};
use linkpost_core::{ContentStore, LinkpostError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed content store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// Cheap to clone; clones share the underlying connection thread.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the given database path, running migrations.
    pub async fn open(path: &str) -> Result<Self, LinkpostError> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    /// Wrap an already-open database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Checkpoint and close the underlying database.
    pub async fn close(self) -> Result<(), LinkpostError> {
        self.db.close().await
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn create_if_absent(&self, source_url: &str) -> Result<ContentItem, LinkpostError> {
        queries::items::create_if_absent(&self.db, source_url).await
    }

    async fn exists_by_url(&self, source_url: &str) -> Result<bool, LinkpostError> {
        queries::items::exists_by_url(&self.db, source_url).await
    }

    async fn get_by_id(&self, id: i64) -> Result<ContentItem, LinkpostError> {
        queries::items::get_by_id(&self.db, id).await
    }

    async fn claim_one_new(&self) -> Result<Option<ContentItem>, LinkpostError> {
        queries::items::claim_one_new(&self.db).await
    }

    async fn update_meta(&self, id: i64, meta: &ItemMeta) -> Result<(), LinkpostError> {
        queries::items::update_meta(&self.db, id, meta).await
    }

    async fn mark_parsed(
        &self,
        id: i64,
        page_url: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), LinkpostError> {
        queries::items::mark_parsed(&self.db, id, page_url, scheduled_at).await
    }

    async fn mark_review_sent(&self, id: i64) -> Result<(), LinkpostError> {
        queries::items::mark_review_sent(&self.db, id).await
    }

    async fn mark_confirmed(&self, id: i64, when: DateTime<Utc>) -> Result<(), LinkpostError> {
        queries::items::mark_confirmed(&self.db, id, when).await
    }

    async fn mark_cancelled(&self, id: i64) -> Result<(), LinkpostError> {
        queries::items::mark_cancelled(&self.db, id).await
    }

    async fn mark_sent(&self, id: i64) -> Result<(), LinkpostError> {
        queries::items::mark_sent(&self.db, id).await
    }

    async fn mark_error(&self, id: i64, message: &str) -> Result<(), LinkpostError> {
        queries::items::mark_error(&self.db, id, message).await
    }

    async fn find_parsed_pending_review(
        &self,
        limit: u32,
    ) -> Result<Vec<ContentItem>, LinkpostError> {
        queries::items::find_parsed_pending_review(&self.db, limit).await
    }

    async fn find_due(
        &self,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<ContentItem>, LinkpostError> {
        queries::items::find_due(&self.db, limit, now).await
    }

    async fn last_scheduled_at(&self) -> Result<Option<DateTime<Utc>>, LinkpostError> {
        queries::items::last_scheduled_at(&self.db).await
    }

    async fn admin_exists(&self, user_id: i64) -> Result<bool, LinkpostError> {
        queries::admins::admin_exists(&self.db, user_id).await
    }

    async fn admin_list(&self) -> Result<Vec<Administrator>, LinkpostError> {
        queries::admins::admin_list(&self.db).await
    }

    async fn admin_add(&self, user_id: i64, display_name: &str) -> Result<(), LinkpostError> {
        queries::admins::admin_add(&self.db, user_id, display_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpost_core::types::ItemStatus;
    use tempfile::tempdir;

    #[tokio::test]
    async fn store_round_trips_through_the_trait() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store_test.db");
        let store = SqliteStore::open(db_path.to_str().unwrap()).await.unwrap();

        // Exercise through the trait object, the way the engine sees it.
        let store: std::sync::Arc<dyn ContentStore> = std::sync::Arc::new(store);

        let item = store
            .create_if_absent("https://example.test/online/trait")
            .await
            .unwrap();
        assert_eq!(item.status, ItemStatus::New);

        let claimed = store.claim_one_new().await.unwrap().unwrap();
        assert_eq!(claimed.id, item.id);
        assert_eq!(claimed.status, ItemStatus::Processing);

        store.admin_add(11, "Reviewer").await.unwrap();
        assert!(store.admin_exists(11).await.unwrap());
    }
}
