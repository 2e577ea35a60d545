// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scraper collaborator trait.

use async_trait::async_trait;

use crate::error::LinkpostError;
use crate::types::ScrapedContent;

/// Extracts descriptive metadata and an ordered image list from a source URL.
///
/// Implementations own their HTTP client and timeouts; a stalled fetch must
/// fail the call, not hang the caller. A non-empty title plus at least one
/// image is the success contract -- anything less is an error.
#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, source_url: &str) -> Result<ScrapedContent, LinkpostError>;
}
