// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fakes and fixtures for the engine's unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use linkpost_core::types::InlineKeyboard;
use linkpost_core::{
    ChatSender, ContentStore, LinkpostError, PagePublisher, ScrapedContent, Scraper,
};
use linkpost_storage::SqliteStore;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SentKind {
    Text,
    Preview,
    Keyboard,
}

#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub preview_url: Option<String>,
    pub keyboard: Option<InlineKeyboard>,
    pub kind: SentKind,
}

/// Chat sender that records every message and can be told to fail.
pub(crate) struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    async fn record(&self, message: SentMessage) -> Result<(), LinkpostError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LinkpostError::network("injected send failure"));
        }
        self.sent.lock().await.push(message);
        Ok(())
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LinkpostError> {
        self.record(SentMessage {
            chat_id,
            text: text.into(),
            preview_url: None,
            keyboard: None,
            kind: SentKind::Text,
        })
        .await
    }

    async fn send_with_preview(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        _large: bool,
        _above: bool,
    ) -> Result<(), LinkpostError> {
        self.record(SentMessage {
            chat_id,
            text: text.into(),
            preview_url: Some(preview_url.into()),
            keyboard: None,
            kind: SentKind::Preview,
        })
        .await
    }

    async fn send_with_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        preview_url: &str,
        _large: bool,
        _above: bool,
        keyboard: InlineKeyboard,
    ) -> Result<(), LinkpostError> {
        self.record(SentMessage {
            chat_id,
            text: text.into(),
            preview_url: Some(preview_url.into()),
            keyboard: Some(keyboard),
            kind: SentKind::Keyboard,
        })
        .await
    }
}

/// Scraper fake returning a fixed outcome.
pub(crate) struct FakeScraper {
    content: Option<ScrapedContent>,
    error: String,
}

impl FakeScraper {
    pub fn succeeding(content: ScrapedContent) -> Self {
        Self {
            content: Some(content),
            error: String::new(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            content: None,
            error: message.into(),
        }
    }
}

#[async_trait]
impl Scraper for FakeScraper {
    async fn scrape(&self, _source_url: &str) -> Result<ScrapedContent, LinkpostError> {
        match &self.content {
            Some(content) => Ok(content.clone()),
            None => Err(LinkpostError::UpstreamApi {
                message: self.error.clone(),
            }),
        }
    }
}

/// Page-publisher fake returning a fixed outcome.
pub(crate) struct FakePublisher {
    page_url: Option<String>,
    error: String,
}

impl FakePublisher {
    pub fn succeeding(page_url: &str) -> Self {
        Self {
            page_url: Some(page_url.into()),
            error: String::new(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            page_url: None,
            error: message.into(),
        }
    }
}

#[async_trait]
impl PagePublisher for FakePublisher {
    async fn create_page(
        &self,
        _title: &str,
        _image_urls: &[String],
    ) -> Result<String, LinkpostError> {
        match &self.page_url {
            Some(url) => Ok(url.clone()),
            None => Err(LinkpostError::UpstreamApi {
                message: self.error.clone(),
            }),
        }
    }
}

/// Scrape fixture matching the sample pages used across tests.
pub(crate) fn sample_scrape() -> ScrapedContent {
    ScrapedContent {
        title: "Quiet Garden".into(),
        series: "Seasons".into(),
        author: "A. Writer".into(),
        translator: "B. Translator".into(),
        tags: vec!["romance".into()],
        image_urls: vec!["https://cdn.test/1.jpg".into(), "https://cdn.test/2.jpg".into()],
    }
}

/// Fresh on-disk store for a test.
pub(crate) async fn open_store() -> (Arc<SqliteStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("engine_test.db");
    let store = SqliteStore::open(db_path.to_str().unwrap()).await.unwrap();
    (Arc::new(store), dir)
}

/// Drive a fresh submission to `parsed` with sample metadata, returning its id.
pub(crate) async fn park_in_parsed(store: &Arc<SqliteStore>, url: &str) -> i64 {
    let item = store.create_if_absent(url).await.unwrap();
    loop {
        let claimed = store.claim_one_new().await.unwrap().unwrap();
        store.update_meta(claimed.id, &sample_scrape().meta()).await.unwrap();
        store
            .mark_parsed(
                claimed.id,
                "https://pages.test/quiet-garden",
                Utc::now() + chrono::Duration::hours(1),
            )
            .await
            .unwrap();
        if claimed.id == item.id {
            break;
        }
    }
    item.id
}
