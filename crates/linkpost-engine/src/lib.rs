// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content lifecycle engine for linkpost.
//!
//! Everything with real concurrency, consistency, or timing invariants lives
//! here: the claim pipeline driving enrichment, the publication scheduler
//! with its fixed daily slots, the TTL-bound session store, the interaction
//! handler, and the moderation gateway. Collaborators (storage, scraper,
//! page publisher, chat platform) arrive as injected trait objects from
//! `linkpost-core`.

pub mod handler;
pub mod moderation;
pub mod pipeline;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod slots;

#[cfg(test)]
pub(crate) mod testutil;

pub use handler::InteractionHandler;
pub use moderation::ModerationGateway;
pub use pipeline::ClaimPipeline;
pub use scheduler::{Scheduler, SchedulerSettings};
pub use session::{SessionKind, SessionState, SessionStore};
pub use slots::next_slot_after;
