// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source-page scraper collaborator.
//!
//! A submission points at one of two page variants for the same work: the
//! metadata page (`/manga/<slug>`) and the reader page (`/online/<slug>`).
//! The scraper derives both from either input form, fetches both, and
//! combines metadata from the first with the ordered image list from the
//! second. Success requires a non-empty title and at least one image.

pub mod extract;

use std::time::Duration;

use async_trait::async_trait;
use linkpost_core::{LinkpostError, ScrapedContent, Scraper};
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

const SERIES_LABEL: &str = "Series";
const AUTHOR_LABEL: &str = "Author";
const TRANSLATOR_LABEL: &str = "Translator";

/// HTTP scraper for source pages.
pub struct SourceScraper {
    client: reqwest::Client,
}

impl SourceScraper {
    /// Build a scraper with the given per-request timeout.
    ///
    /// The timeout bounds every fetch so a stalled source site fails the
    /// scrape instead of stalling the pipeline tick.
    pub fn new(timeout: Duration) -> Result<Self, LinkpostError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LinkpostError::Config(format!("scraper HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, LinkpostError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| LinkpostError::Network {
                message: format!("fetch {url}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkpostError::UpstreamApi {
                message: format!("source page {url} answered {status}"),
            });
        }

        response.text().await.map_err(|e| LinkpostError::Network {
            message: format!("read body of {url}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Derive the metadata/reader URL pair from either input form.
///
/// Unparseable input is passed through unchanged so the fetch produces the
/// real error.
pub fn derive_pair_urls(input: &str) -> (String, String) {
    let Ok(parsed) = url::Url::parse(input) else {
        return (input.to_string(), input.to_string());
    };
    let slug = parsed.path().rsplit('/').next().unwrap_or_default();
    let origin = parsed.origin().ascii_serialization();
    (
        format!("{origin}/manga/{slug}"),
        format!("{origin}/online/{slug}"),
    )
}

#[async_trait]
impl Scraper for SourceScraper {
    async fn scrape(&self, source_url: &str) -> Result<ScrapedContent, LinkpostError> {
        let (meta_url, reader_url) = derive_pair_urls(source_url);

        let meta_html = self.fetch_page(&meta_url).await?;
        let reader_html = self.fetch_page(&reader_url).await?;

        let title = {
            let t = extract::extract_title(&meta_html);
            if t.is_empty() {
                extract::extract_json_name(&reader_html)
            } else {
                t
            }
        };

        let mut images = extract::extract_image_array(&reader_html);
        if images.is_empty() {
            images = extract::extract_img_tags(&reader_html);
        }
        if images.is_empty() {
            images = extract::extract_any_quoted_images(&reader_html);
        }
        let images = extract::normalize_urls(&reader_url, images);

        if title.is_empty() {
            return Err(LinkpostError::Validation(format!(
                "no title found at {meta_url}"
            )));
        }
        if images.is_empty() {
            return Err(LinkpostError::Validation(format!(
                "no images found at {reader_url}"
            )));
        }

        debug!(
            url = source_url,
            images = images.len(),
            "scrape succeeded"
        );

        Ok(ScrapedContent {
            title,
            series: extract::extract_labeled_field(&meta_html, SERIES_LABEL),
            author: extract::extract_labeled_field(&meta_html, AUTHOR_LABEL),
            translator: extract::extract_labeled_field(&meta_html, TRANSLATOR_LABEL),
            tags: extract::extract_tags(&meta_html),
            image_urls: images,
        })
    }
}
