// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! telegra.ph page-publisher collaborator.
//!
//! Creates a page holding the ordered image list via the `createPage`
//! endpoint. The API answers HTTP 200 even for failures, signalling them
//! through `ok = false` in the body.

use std::time::Duration;

use async_trait::async_trait;
use linkpost_core::{LinkpostError, PagePublisher};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.telegra.ph";

/// One node of page content. Only `img` nodes are emitted.
#[derive(Debug, Serialize)]
struct Node {
    tag: &'static str,
    attrs: NodeAttrs,
}

#[derive(Debug, Serialize)]
struct NodeAttrs {
    src: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    ok: bool,
    #[serde(default)]
    result: Option<PageResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageResult {
    url: String,
}

/// Client for the telegra.ph page-creation API.
pub struct TelegraphClient {
    client: reqwest::Client,
    api_url: String,
    access_token: String,
    author_name: String,
    author_url: String,
}

impl TelegraphClient {
    /// Build a client against the production API.
    pub fn new(
        access_token: impl Into<String>,
        author_name: impl Into<String>,
        author_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LinkpostError> {
        Self::with_api_url(DEFAULT_API_URL, access_token, author_name, author_url, timeout)
    }

    /// Build a client against an explicit API base URL. Used by tests.
    pub fn with_api_url(
        api_url: impl Into<String>,
        access_token: impl Into<String>,
        author_name: impl Into<String>,
        author_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LinkpostError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LinkpostError::Config(format!("telegraph HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            author_name: author_name.into(),
            author_url: author_url.into(),
        })
    }
}

#[async_trait]
impl PagePublisher for TelegraphClient {
    async fn create_page(
        &self,
        title: &str,
        image_urls: &[String],
    ) -> Result<String, LinkpostError> {
        let content: Vec<Node> = image_urls
            .iter()
            .map(|u| Node {
                tag: "img",
                attrs: NodeAttrs { src: u.clone() },
            })
            .collect();
        let content_json =
            serde_json::to_string(&content).map_err(|e| LinkpostError::Network {
                message: "serialize page content".into(),
                source: Some(Box::new(e)),
            })?;

        let form = [
            ("access_token", self.access_token.as_str()),
            ("title", title),
            ("author_name", self.author_name.as_str()),
            ("author_url", self.author_url.as_str()),
            ("content", content_json.as_str()),
            ("return_content", "false"),
        ];

        let response = self
            .client
            .post(format!("{}/createPage", self.api_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| LinkpostError::Network {
                message: "createPage request".into(),
                source: Some(Box::new(e)),
            })?;

        let body: PageResponse = response.json().await.map_err(|e| LinkpostError::Network {
            message: "decode createPage response".into(),
            source: Some(Box::new(e)),
        })?;

        if !body.ok {
            return Err(LinkpostError::UpstreamApi {
                message: format!(
                    "createPage failed: {}",
                    body.error.unwrap_or_else(|| "unknown error".into())
                ),
            });
        }

        let url = body
            .result
            .map(|r| r.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| LinkpostError::UpstreamApi {
                message: "createPage answered ok without a page URL".into(),
            })?;

        debug!(page_url = %url, images = image_urls.len(), "page created");
        Ok(url)
    }
}
