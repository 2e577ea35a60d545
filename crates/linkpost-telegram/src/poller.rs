// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-poll update source.
//!
//! Polls `getUpdates` with an advancing offset so each update is consumed
//! exactly once, converts them, and pushes them into an mpsc channel the
//! interaction handler consumes. Shutdown is checked between iterations,
//! never inside an in-flight call.

use std::time::Duration;

use linkpost_core::InboundUpdate;
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::convert;

/// Delay before retrying after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Long-polling update loop feeding the interaction handler.
pub struct TelegramPoller {
    bot: Bot,
    poll_timeout_secs: u32,
    shutdown: CancellationToken,
}

impl TelegramPoller {
    pub fn new(bot: Bot, poll_timeout_secs: u32, shutdown: CancellationToken) -> Self {
        Self {
            bot,
            poll_timeout_secs,
            shutdown,
        }
    }

    /// Run until the shutdown token fires or the receiving side goes away.
    pub async fn run(self, tx: mpsc::Sender<InboundUpdate>) {
        let mut offset: i32 = 0;
        info!("telegram polling started");

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let updates = match self
                .bot
                .get_updates()
                .offset(offset)
                .timeout(self.poll_timeout_secs)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "get updates failed");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                // Advance past the highest update id seen so the next poll
                // never re-delivers this update.
                offset = offset.max(update.id.0 as i32 + 1);
                if let Some(inbound) = convert::to_inbound(update)
                    && tx.send(inbound).await.is_err()
                {
                    warn!("inbound channel closed, stopping poller");
                    return;
                }
            }
        }

        info!("telegram polling stopped");
    }
}
