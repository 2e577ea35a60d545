// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enrichment pipeline: claim, scrape, publish, schedule.
//!
//! Each tick claims at most one `new` item. A claimed item either reaches
//! `parsed` (with a draft schedule) or lands in `error` with the failure
//! recorded; there is no in-place retry -- an errored item re-enters the
//! lifecycle only through re-submission. Storage failures after a
//! collaborator call succeeded can leave an item stuck in `processing`;
//! recovery is manual via `last_error`, an accepted at-least-once tradeoff.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use linkpost_core::{ContentItem, ContentStore, LinkpostError, PagePublisher, Scraper};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::slots;

/// Worker loop driving `new` items through enrichment.
pub struct ClaimPipeline {
    store: Arc<dyn ContentStore>,
    scraper: Arc<dyn Scraper>,
    publisher: Arc<dyn PagePublisher>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ClaimPipeline {
    pub fn new(
        store: Arc<dyn ContentStore>,
        scraper: Arc<dyn Scraper>,
        publisher: Arc<dyn PagePublisher>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            scraper,
            publisher,
            interval,
            shutdown,
        }
    }

    /// Run until the shutdown token fires. Cancellation is checked between
    /// ticks, never inside an in-flight collaborator call.
    pub async fn run(&self) {
        info!("claim pipeline started");
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
            if let Err(e) = self.tick().await {
                error!(error = %e, "claim tick aborted");
            }
        }
        info!("claim pipeline stopped");
    }

    /// Claim and process at most one item. Returns whether one was claimed.
    ///
    /// Only claim-side storage errors propagate; processing failures are
    /// recorded on the item itself.
    pub async fn tick(&self) -> Result<bool, LinkpostError> {
        let Some(item) = self.store.claim_one_new().await? else {
            return Ok(false);
        };
        self.process(item).await;
        Ok(true)
    }

    async fn process(&self, item: ContentItem) {
        let started = std::time::Instant::now();
        info!(id = item.id, url = %item.source_url, "processing item");

        let scraped = match self.scraper.scrape(&item.source_url).await {
            Ok(scraped) => scraped,
            Err(e) => {
                self.record_failure(item.id, "scrape", &e).await;
                return;
            }
        };

        if let Err(e) = self.store.update_meta(item.id, &scraped.meta()).await {
            // Pure storage failure: leave the item in `processing` for the
            // operator rather than guessing at a second write.
            error!(id = item.id, error = %e, "storing enrichment meta failed");
            return;
        }
        info!(
            id = item.id,
            title = %scraped.title,
            images = scraped.image_urls.len(),
            "scraped"
        );

        let page_url = match self
            .publisher
            .create_page(&scraped.title, &scraped.image_urls)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.record_failure(item.id, "publish", &e).await;
                return;
            }
        };
        info!(id = item.id, page_url = %page_url, "page published");

        let anchor = match self.store.last_scheduled_at().await {
            Ok(last) => last.unwrap_or_else(Utc::now),
            Err(e) => {
                error!(id = item.id, error = %e, "reading schedule anchor failed");
                return;
            }
        };
        let draft_slot = slots::next_slot_after(anchor);

        if let Err(e) = self.store.mark_parsed(item.id, &page_url, draft_slot).await {
            error!(id = item.id, error = %e, "marking parsed failed");
            return;
        }

        info!(
            id = item.id,
            scheduled_at = %draft_slot,
            elapsed_ms = started.elapsed().as_millis(),
            "item parsed"
        );
    }

    async fn record_failure(&self, id: i64, stage: &str, err: &LinkpostError) {
        warn!(id, stage, error = %err, "enrichment failed");
        if let Err(e) = self.store.mark_error(id, &format!("{stage} failed: {err}")).await {
            error!(id, error = %e, "recording enrichment failure failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakePublisher, FakeScraper, open_store, sample_scrape};
    use linkpost_core::ItemStatus;
    use linkpost_storage::parse_ts;

    fn pipeline(
        store: Arc<dyn ContentStore>,
        scraper: FakeScraper,
        publisher: FakePublisher,
    ) -> ClaimPipeline {
        ClaimPipeline::new(
            store,
            Arc::new(scraper),
            Arc::new(publisher),
            Duration::from_millis(10),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn tick_without_work_claims_nothing() {
        let (store, _dir) = open_store().await;
        let p = pipeline(
            store,
            FakeScraper::succeeding(sample_scrape()),
            FakePublisher::succeeding("https://pages.test/p"),
        );
        assert!(!p.tick().await.unwrap());
    }

    #[tokio::test]
    async fn successful_tick_enriches_and_marks_parsed() {
        let (store, _dir) = open_store().await;
        let item = store
            .create_if_absent("https://example.test/online/abc")
            .await
            .unwrap();

        let p = pipeline(
            store.clone(),
            FakeScraper::succeeding(sample_scrape()),
            FakePublisher::succeeding("https://pages.test/abc"),
        );
        assert!(p.tick().await.unwrap());

        let parsed = store.get_by_id(item.id).await.unwrap();
        assert_eq!(parsed.status, ItemStatus::Parsed);
        assert_eq!(parsed.page_url, "https://pages.test/abc");
        assert_eq!(parsed.name, "Quiet Garden");
        assert_eq!(parsed.tags, vec!["romance"]);
        assert!(parsed.last_error.is_empty());

        // Draft slot is a real future timestamp.
        let slot = parse_ts(parsed.scheduled_at.as_deref().unwrap()).unwrap();
        assert!(slot > Utc::now());
    }

    #[tokio::test]
    async fn scrape_failure_marks_error_and_item_stays_out_of_the_queue() {
        let (store, _dir) = open_store().await;
        let item = store
            .create_if_absent("https://example.test/online/bad")
            .await
            .unwrap();

        let p = pipeline(
            store.clone(),
            FakeScraper::failing("source page answered 503"),
            FakePublisher::succeeding("https://pages.test/unused"),
        );
        assert!(p.tick().await.unwrap());

        let errored = store.get_by_id(item.id).await.unwrap();
        assert_eq!(errored.status, ItemStatus::Error);
        assert!(errored.last_error.contains("scrape failed"));
        assert!(errored.last_error.contains("503"));

        // No automatic retry: the next tick finds nothing to claim.
        assert!(!p.tick().await.unwrap());
    }

    #[tokio::test]
    async fn publish_failure_marks_error_but_keeps_scraped_meta() {
        let (store, _dir) = open_store().await;
        let item = store
            .create_if_absent("https://example.test/online/pub")
            .await
            .unwrap();

        let p = pipeline(
            store.clone(),
            FakeScraper::succeeding(sample_scrape()),
            FakePublisher::failing("createPage failed: FLOOD_WAIT"),
        );
        assert!(p.tick().await.unwrap());

        let errored = store.get_by_id(item.id).await.unwrap();
        assert_eq!(errored.status, ItemStatus::Error);
        assert!(errored.last_error.contains("publish failed"));
        assert_eq!(errored.name, "Quiet Garden", "meta from the scrape is kept");
        assert!(errored.page_url.is_empty());
    }

    #[tokio::test]
    async fn run_stops_promptly_on_cancellation() {
        let (store, _dir) = open_store().await;
        let shutdown = CancellationToken::new();
        let p = ClaimPipeline::new(
            store,
            Arc::new(FakeScraper::succeeding(sample_scrape())),
            Arc::new(FakePublisher::succeeding("https://pages.test/p")),
            Duration::from_millis(5),
            shutdown.clone(),
        );

        let handle = tokio::spawn(async move { p.run().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("run should stop after cancellation")
            .unwrap();
    }
}
