// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the engine and its collaborators.
//!
//! Every external dependency of the lifecycle engine (storage, scraper, page
//! publisher, chat platform) is reached through one of these traits so tests
//! can substitute fakes.

pub mod chat;
pub mod publisher;
pub mod scraper;
pub mod store;

pub use chat::ChatSender;
pub use publisher::PagePublisher;
pub use scraper::Scraper;
pub use store::ContentStore;
