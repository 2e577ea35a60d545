// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publication scheduler: the review pass and the dispatch pass.
//!
//! Both passes run every tick and are independent: a repository error aborts
//! only the failing pass for that tick, and the next tick starts from a fresh
//! query -- no partial-batch state survives a tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use linkpost_core::types::{InlineButton, InlineKeyboard};
use linkpost_core::{ChatSender, ContentItem, ContentStore, LinkpostError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::render;

/// Scheduler configuration distilled to what the loop needs.
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub channel_id: i64,
    pub interval: Duration,
    pub review_batch: u32,
    pub dispatch_batch: u32,
    pub subscribe_url: Option<String>,
    pub subscribe_label: String,
}

/// Periodic loop surfacing items for review and dispatching due posts.
pub struct Scheduler {
    store: Arc<dyn ContentStore>,
    sender: Arc<dyn ChatSender>,
    settings: SchedulerSettings,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn ContentStore>,
        sender: Arc<dyn ChatSender>,
        settings: SchedulerSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            sender,
            settings,
            shutdown,
        }
    }

    /// Run until the shutdown token fires; cancellation is checked between
    /// ticks.
    pub async fn run(&self) {
        info!(
            channel_id = self.settings.channel_id,
            interval_secs = self.settings.interval.as_secs(),
            "scheduler started"
        );
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
            self.tick().await;
        }
        info!("scheduler stopped");
    }

    /// One scheduler tick: review pass, then dispatch pass.
    pub async fn tick(&self) {
        if let Err(e) = self.review_pass().await {
            error!(error = %e, "review pass aborted");
        }
        if let Err(e) = self.dispatch_pass().await {
            error!(error = %e, "dispatch pass aborted");
        }
    }

    fn render(&self, item: &ContentItem) -> String {
        render::build_message_text(
            item,
            self.settings.subscribe_url.as_deref(),
            &self.settings.subscribe_label,
        )
    }

    /// Surface newly parsed items to every administrator.
    ///
    /// An item is marked `review_sent` only after at least one administrator
    /// actually received the prompt; with zero admins (or all sends failing)
    /// the batch stays pending and is retried next tick.
    pub async fn review_pass(&self) -> Result<(), LinkpostError> {
        let pending = self
            .store
            .find_parsed_pending_review(self.settings.review_batch)
            .await?;
        if pending.is_empty() {
            return Ok(());
        }

        let admins = self.store.admin_list().await?;
        if admins.is_empty() {
            error!(
                pending = pending.len(),
                "no administrators registered; review prompts stay pending"
            );
            return Ok(());
        }

        for item in pending {
            if item.page_url.is_empty() {
                warn!(id = item.id, "parsed item without a page URL");
                self.store.mark_error(item.id, "empty page url").await?;
                continue;
            }

            let text = self.render(&item);
            let keyboard = InlineKeyboard::single_row(vec![
                InlineButton::new("Accept", format!("confirm:{}", item.id)),
                InlineButton::new("Reject", format!("reject:{}", item.id)),
            ]);

            let mut notified = 0usize;
            for admin in &admins {
                match self
                    .sender
                    .send_with_keyboard(
                        admin.user_id,
                        &text,
                        &item.page_url,
                        true,
                        false,
                        keyboard.clone(),
                    )
                    .await
                {
                    Ok(()) => notified += 1,
                    Err(e) => {
                        warn!(
                            id = item.id,
                            admin = admin.user_id,
                            error = %e,
                            "review prompt failed"
                        );
                    }
                }
            }

            if notified == 0 {
                warn!(id = item.id, "no administrator reachable; will retry");
                continue;
            }

            self.store.mark_review_sent(item.id).await?;
            info!(id = item.id, notified, "review prompt sent");
        }

        Ok(())
    }

    /// Send due confirmed items to the broadcast channel.
    pub async fn dispatch_pass(&self) -> Result<(), LinkpostError> {
        let due = self
            .store
            .find_due(self.settings.dispatch_batch, Utc::now())
            .await?;

        for item in due {
            if item.page_url.is_empty() {
                warn!(id = item.id, "confirmed item without a page URL");
                self.store.mark_error(item.id, "empty page url").await?;
                continue;
            }

            let text = self.render(&item);
            // Large preview rendered below the text.
            if let Err(e) = self
                .sender
                .send_with_preview(self.settings.channel_id, &text, &item.page_url, true, false)
                .await
            {
                warn!(id = item.id, error = %e, "dispatch failed; will retry");
                continue;
            }

            self.store.mark_sent(item.id).await?;
            info!(id = item.id, "item dispatched to channel");
        }

        Ok(())
    }
}
