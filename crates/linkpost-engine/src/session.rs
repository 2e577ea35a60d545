// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user interaction sessions with TTL expiry.
//!
//! The store is a passive keyed-TTL map, not a workflow engine: transitions
//! are driven entirely by the interaction handler. Sessions are in-memory
//! only; a process restart loses them, which is accepted because users can
//! resume by re-issuing the start command.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Discriminant of the per-user interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    /// Initial / post-cancel state; plain text is ignored here.
    #[default]
    Default,
    /// Entered by the start command; the only state accepting a submission.
    AwaitingLink,
}

/// Interaction state for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub kind: SessionKind,
    /// Open-ended attribute bag for handler bookkeeping.
    pub attrs: HashMap<String, String>,
}

impl SessionState {
    pub fn awaiting_link() -> Self {
        Self {
            kind: SessionKind::AwaitingLink,
            attrs: HashMap::new(),
        }
    }
}

struct SessionEntry {
    state: SessionState,
    last_seen_at: Instant,
    #[allow(dead_code)]
    created_at: Instant,
}

/// Concurrent map of user id to session, swept on a background interval.
///
/// Reads refresh `last_seen_at` as a side effect, so a read is not pure --
/// but the sharded map keeps reads of different keys from blocking each
/// other, and the sweep takes the write path per shard.
pub struct SessionStore {
    entries: DashMap<i64, SessionEntry>,
    ttl: Duration,
    sweep_interval: Duration,
    shutdown: CancellationToken,
}

impl SessionStore {
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            sweep_interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// Fetch a user's session, refreshing its idle timer.
    pub fn get(&self, user_id: i64) -> Option<SessionState> {
        let mut entry = self.entries.get_mut(&user_id)?;
        entry.last_seen_at = Instant::now();
        Some(entry.state.clone())
    }

    /// Upsert a user's session; `created_at` is stamped on first write.
    pub fn set(&self, user_id: i64, state: SessionState) {
        let now = Instant::now();
        match self.entries.get_mut(&user_id) {
            Some(mut entry) => {
                entry.state = state;
                entry.last_seen_at = now;
            }
            None => {
                debug!(user_id, "new session");
                self.entries.insert(
                    user_id,
                    SessionEntry {
                        state,
                        last_seen_at: now,
                        created_at: now,
                    },
                );
            }
        }
    }

    /// Drop a user's session explicitly.
    pub fn remove(&self, user_id: i64) {
        self.entries.remove(&user_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry idle longer than the TTL. Returns how many were
    /// removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen_at) <= self.ttl);
        before - self.entries.len()
    }

    /// Spawn the background sweep loop.
    ///
    /// The task stops when [`shutdown`](SessionStore::shutdown) is called;
    /// store operations remain valid afterwards, only automatic expiry ends.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.sweep_interval);
            // The first tick fires immediately; skip it so a fresh store is
            // not swept before anyone used it.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = store.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = store.sweep_expired();
                        if removed > 0 {
                            info!(removed, "expired idle sessions");
                        }
                    }
                }
            }
            debug!("session sweeper stopped");
        })
    }

    /// Stop the background sweep.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
