// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page-publisher collaborator trait.

use async_trait::async_trait;

use crate::error::LinkpostError;

/// Creates a published page from a title and an ordered image list.
#[async_trait]
pub trait PagePublisher: Send + Sync {
    /// Returns the URL of the created page.
    async fn create_page(
        &self,
        title: &str,
        image_urls: &[String],
    ) -> Result<String, LinkpostError>;
}
