// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `linkpost processor` command implementation.
//!
//! Runs the enrichment role: the claim pipeline against the shared database.
//! Several processor instances may run concurrently; the storage-level claim
//! protocol keeps them from processing the same item twice.

use std::sync::Arc;
use std::time::Duration;

use linkpost_config::LinkpostConfig;
use linkpost_core::LinkpostError;
use linkpost_engine::ClaimPipeline;
use linkpost_scraper::SourceScraper;
use linkpost_storage::SqliteStore;
use linkpost_telegraph::TelegraphClient;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run_processor(config: LinkpostConfig) -> Result<(), LinkpostError> {
    let access_token = config.telegraph.access_token.clone().ok_or_else(|| {
        LinkpostError::Config("telegraph.access_token is required for the processor role".into())
    })?;

    info!("starting linkpost processor");

    let store = Arc::new(SqliteStore::open(&config.storage.database_path).await?);
    let scraper = Arc::new(SourceScraper::new(Duration::from_secs(
        config.pipeline.scrape_timeout_secs,
    ))?);
    let publisher = Arc::new(TelegraphClient::new(
        access_token,
        config.telegraph.author_name.clone(),
        config.telegraph.author_url.clone(),
        Duration::from_secs(config.telegraph.publish_timeout_secs),
    )?);

    let shutdown = CancellationToken::new();
    let pipeline = ClaimPipeline::new(
        store,
        scraper,
        publisher,
        Duration::from_secs(config.pipeline.interval_secs),
        shutdown.clone(),
    );
    let pipeline_task = tokio::spawn(async move { pipeline.run().await });

    crate::wait_for_shutdown_signal().await;
    info!("shutdown signal received");

    shutdown.cancel();
    let _ = pipeline_task.await;

    info!("linkpost processor stopped");
    Ok(())
}
