// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `linkpost bot` command implementation.
//!
//! Runs the chat-facing role: the long-poll update loop feeding the
//! interaction handler, the publication scheduler, and the session sweeper.
//! All loops share one shutdown token and are joined before exit.

use std::sync::Arc;
use std::time::Duration;

use linkpost_config::LinkpostConfig;
use linkpost_core::{ChatSender, ContentStore, LinkpostError};
use linkpost_engine::{InteractionHandler, Scheduler, SchedulerSettings, SessionStore};
use linkpost_storage::SqliteStore;
use linkpost_telegram::{TelegramPoller, TelegramSender};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run_bot(config: LinkpostConfig) -> Result<(), LinkpostError> {
    let token = config.telegram.bot_token.clone().ok_or_else(|| {
        LinkpostError::Config("telegram.bot_token is required for the bot role".into())
    })?;
    let channel_id = config.telegram.channel_id.ok_or_else(|| {
        LinkpostError::Config("telegram.channel_id is required for the bot role".into())
    })?;

    info!("starting linkpost bot");

    let store: Arc<dyn ContentStore> =
        Arc::new(SqliteStore::open(&config.storage.database_path).await?);
    let sender = Arc::new(TelegramSender::from_token(&token));
    let sessions = Arc::new(SessionStore::new(
        Duration::from_secs(config.session.ttl_secs),
        Duration::from_secs(config.session.sweep_interval_secs),
    ));
    let shutdown = CancellationToken::new();

    let sweeper_task = sessions.spawn_sweeper();

    let scheduler = Scheduler::new(
        Arc::clone(&store),
        Arc::clone(&sender) as Arc<dyn ChatSender>,
        SchedulerSettings {
            channel_id,
            interval: Duration::from_secs(config.scheduler.interval_secs),
            review_batch: config.scheduler.review_batch,
            dispatch_batch: config.scheduler.dispatch_batch,
            subscribe_url: config.scheduler.subscribe_url.clone(),
            subscribe_label: config.scheduler.subscribe_label.clone(),
        },
        shutdown.clone(),
    );
    let scheduler_task = tokio::spawn(async move { scheduler.run().await });

    let (tx, rx) = mpsc::channel(100);
    let poller = TelegramPoller::new(
        sender.bot().clone(),
        config.telegram.poll_timeout_secs,
        shutdown.clone(),
    );
    let poller_task = tokio::spawn(poller.run(tx));

    let handler = InteractionHandler::new(
        Arc::clone(&store),
        Arc::clone(&sessions),
        Arc::clone(&sender) as Arc<dyn ChatSender>,
    );
    let handler_shutdown = shutdown.clone();
    let handler_task = tokio::spawn(async move { handler.run(rx, handler_shutdown).await });

    crate::wait_for_shutdown_signal().await;
    info!("shutdown signal received");

    shutdown.cancel();
    sessions.shutdown();
    let _ = tokio::join!(scheduler_task, poller_task, handler_task, sweeper_task);

    info!("linkpost bot stopped");
    Ok(())
}
