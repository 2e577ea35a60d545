// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for linkpost.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the typed item/administrator
//! queries behind the [`ContentStore`](linkpost_core::ContentStore) trait.
//! The atomic claim protocol lives here: select-oldest-and-flip runs inside
//! an immediate transaction, so exclusivity holds across process boundaries.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod store;

pub use database::Database;
pub use models::{format_ts, parse_ts};
pub use store::SqliteStore;
