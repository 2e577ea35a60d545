// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Moderation gateway: turns admin callback presses into status transitions.
//!
//! Only registered administrators may act; everyone else is silently ignored
//! so the moderation surface stays invisible to regular users. Malformed
//! payloads are dropped without side effects.

use std::sync::Arc;

use chrono::Utc;
use linkpost_core::{ChatSender, ContentStore, LinkpostError};
use tracing::{debug, info};

use crate::slots;

/// A parsed moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Confirm(i64),
    Reject(i64),
}

/// Parse a `confirm:<id>` / `reject:<id>` callback payload.
///
/// Anything else -- unknown verb, missing or non-numeric id -- is `None`.
pub fn parse_callback(data: &str) -> Option<ModerationAction> {
    if let Some(raw) = data.strip_prefix("confirm:") {
        return raw.parse().ok().map(ModerationAction::Confirm);
    }
    if let Some(raw) = data.strip_prefix("reject:") {
        return raw.parse().ok().map(ModerationAction::Reject);
    }
    None
}

/// Handles inbound moderation callbacks.
pub struct ModerationGateway {
    store: Arc<dyn ContentStore>,
    sender: Arc<dyn ChatSender>,
}

impl ModerationGateway {
    pub fn new(store: Arc<dyn ContentStore>, sender: Arc<dyn ChatSender>) -> Self {
        Self { store, sender }
    }

    /// Apply one callback. Non-admin senders and malformed payloads are
    /// no-ops; an already-moderated item is acknowledged-by-silence so a
    /// double press has no effect.
    pub async fn handle_callback(
        &self,
        chat_id: i64,
        user_id: i64,
        data: &str,
    ) -> Result<(), LinkpostError> {
        if !self.store.admin_exists(user_id).await? {
            debug!(user_id, "callback from non-admin ignored");
            return Ok(());
        }

        let Some(action) = parse_callback(data) else {
            debug!(user_id, data, "malformed callback ignored");
            return Ok(());
        };

        match action {
            ModerationAction::Confirm(id) => {
                let anchor = self
                    .store
                    .last_scheduled_at()
                    .await?
                    .unwrap_or_else(Utc::now);
                let slot = slots::next_slot_after(anchor);
                match self.store.mark_confirmed(id, slot).await {
                    Ok(()) => {
                        info!(id, user_id, scheduled_at = %slot, "item confirmed");
                        self.sender
                            .send_text(chat_id, "Post confirmed and queued.")
                            .await?;
                    }
                    Err(LinkpostError::NotFound(_)) => {
                        debug!(id, "confirm for an item no longer pending review");
                    }
                    Err(e) => return Err(e),
                }
            }
            ModerationAction::Reject(id) => match self.store.mark_cancelled(id).await {
                Ok(()) => {
                    info!(id, user_id, "item rejected");
                    self.sender.send_text(chat_id, "Post rejected.").await?;
                }
                Err(LinkpostError::NotFound(_)) => {
                    debug!(id, "reject for an item no longer pending review");
                }
                Err(e) => return Err(e),
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingSender, open_store, park_in_parsed};
    use linkpost_core::ItemStatus;
    use linkpost_storage::parse_ts;

    #[test]
    fn parse_callback_accepts_well_formed_payloads() {
        assert_eq!(parse_callback("confirm:12"), Some(ModerationAction::Confirm(12)));
        assert_eq!(parse_callback("reject:5"), Some(ModerationAction::Reject(5)));
    }

    #[test]
    fn parse_callback_rejects_everything_else() {
        assert_eq!(parse_callback("confirm:abc"), None);
        assert_eq!(parse_callback("confirm:"), None);
        assert_eq!(parse_callback("approve:12"), None);
        assert_eq!(parse_callback("confirm"), None);
        assert_eq!(parse_callback(""), None);
    }

    #[tokio::test]
    async fn non_admin_callback_changes_nothing() {
        let (store, _dir) = open_store().await;
        let id = park_in_parsed(&store, "https://example.test/online/m1").await;

        let sender = Arc::new(RecordingSender::new());
        let gateway = ModerationGateway::new(store.clone(), sender.clone());
        gateway
            .handle_callback(99, 99, &format!("confirm:{id}"))
            .await
            .unwrap();

        assert_eq!(store.get_by_id(id).await.unwrap().status, ItemStatus::Parsed);
        assert!(sender.sent().await.is_empty(), "no reply leaks to non-admins");
    }

    #[tokio::test]
    async fn confirm_schedules_next_slot_and_acks() {
        let (store, _dir) = open_store().await;
        let id = park_in_parsed(&store, "https://example.test/online/m2").await;
        store.admin_add(7, "Admin").await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let gateway = ModerationGateway::new(store.clone(), sender.clone());
        gateway
            .handle_callback(7, 7, &format!("confirm:{id}"))
            .await
            .unwrap();

        let confirmed = store.get_by_id(id).await.unwrap();
        assert_eq!(confirmed.status, ItemStatus::Confirmed);
        let slot = parse_ts(confirmed.scheduled_at.as_deref().unwrap()).unwrap();
        assert_eq!(slot, slots::next_slot_after(Utc::now()));

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 7);
        assert!(sent[0].text.contains("confirmed"));
    }

    #[tokio::test]
    async fn successive_confirms_queue_in_nondecreasing_slot_order() {
        let (store, _dir) = open_store().await;
        let first = park_in_parsed(&store, "https://example.test/online/m3").await;
        let second = park_in_parsed(&store, "https://example.test/online/m4").await;
        store.admin_add(7, "Admin").await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let gateway = ModerationGateway::new(store.clone(), sender.clone());
        gateway.handle_callback(7, 7, &format!("confirm:{first}")).await.unwrap();
        gateway.handle_callback(7, 7, &format!("confirm:{second}")).await.unwrap();

        let slot_a = parse_ts(
            store.get_by_id(first).await.unwrap().scheduled_at.as_deref().unwrap(),
        )
        .unwrap();
        let slot_b = parse_ts(
            store.get_by_id(second).await.unwrap().scheduled_at.as_deref().unwrap(),
        )
        .unwrap();
        assert!(slot_b > slot_a, "second confirm anchors on the first's slot");
        assert_eq!(slot_b, slots::next_slot_after(slot_a));
    }

    #[tokio::test]
    async fn reject_cancels_and_acks() {
        let (store, _dir) = open_store().await;
        let id = park_in_parsed(&store, "https://example.test/online/m5").await;
        store.admin_add(7, "Admin").await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let gateway = ModerationGateway::new(store.clone(), sender.clone());
        gateway
            .handle_callback(7, 7, &format!("reject:{id}"))
            .await
            .unwrap();

        assert_eq!(
            store.get_by_id(id).await.unwrap().status,
            ItemStatus::Cancelled
        );
        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("rejected"));
    }

    #[tokio::test]
    async fn malformed_and_stale_callbacks_have_no_side_effects() {
        let (store, _dir) = open_store().await;
        let id = park_in_parsed(&store, "https://example.test/online/m6").await;
        store.admin_add(7, "Admin").await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let gateway = ModerationGateway::new(store.clone(), sender.clone());

        // Non-numeric suffix.
        gateway.handle_callback(7, 7, "confirm:oops").await.unwrap();
        assert_eq!(store.get_by_id(id).await.unwrap().status, ItemStatus::Parsed);

        // Unknown id: silently ignored, no ack.
        gateway.handle_callback(7, 7, "confirm:424242").await.unwrap();
        assert!(sender.sent().await.is_empty());

        // Double press: the second reject finds the item already cancelled.
        gateway.handle_callback(7, 7, &format!("reject:{id}")).await.unwrap();
        gateway.handle_callback(7, 7, &format!("reject:{id}")).await.unwrap();
        assert_eq!(sender.sent().await.len(), 1, "only the first press acks");
    }
}
