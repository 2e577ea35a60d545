// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction handler: routes inbound updates into session transitions,
//! submissions, and moderation callbacks.

use std::sync::Arc;

use linkpost_core::{ChatSender, ContentStore, InboundUpdate, LinkpostError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::moderation::ModerationGateway;
use crate::session::{SessionKind, SessionState, SessionStore};

/// Routes user messages and commands through the session FSM.
pub struct InteractionHandler {
    store: Arc<dyn ContentStore>,
    sessions: Arc<SessionStore>,
    sender: Arc<dyn ChatSender>,
    moderation: ModerationGateway,
}

impl InteractionHandler {
    pub fn new(
        store: Arc<dyn ContentStore>,
        sessions: Arc<SessionStore>,
        sender: Arc<dyn ChatSender>,
    ) -> Self {
        let moderation = ModerationGateway::new(Arc::clone(&store), Arc::clone(&sender));
        Self {
            store,
            sessions,
            sender,
            moderation,
        }
    }

    /// Consume updates from the poller until the channel closes or the
    /// shutdown token fires.
    pub async fn run(&self, mut rx: mpsc::Receiver<InboundUpdate>, shutdown: CancellationToken) {
        info!("interaction handler started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                update = rx.recv() => {
                    let Some(update) = update else { break };
                    self.handle(update).await;
                }
            }
        }
        info!("interaction handler stopped");
    }

    /// Dispatch one update. Errors are logged here; nothing in interaction
    /// handling is fatal to the loop.
    pub async fn handle(&self, update: InboundUpdate) {
        let result = match update {
            InboundUpdate::Message {
                chat_id,
                user_id,
                text,
            } => {
                if text.trim().starts_with('/') {
                    self.handle_command(chat_id, user_id, text.trim()).await
                } else {
                    self.handle_text(chat_id, user_id, &text).await
                }
            }
            InboundUpdate::Callback {
                chat_id,
                user_id,
                data,
            } => self.moderation.handle_callback(chat_id, user_id, &data).await,
        };

        if let Err(e) = result {
            error!(error = %e, "update handling failed");
        }
    }

    async fn handle_command(
        &self,
        chat_id: i64,
        user_id: i64,
        command: &str,
    ) -> Result<(), LinkpostError> {
        match command {
            "/start" => {
                let previous = self.sessions.get(user_id).map(|s| s.kind);
                debug!(user_id, ?previous, "start command");
                self.sessions.set(user_id, SessionState::awaiting_link());
                self.sender
                    .send_text(chat_id, "Hi! Send me a link to submit.")
                    .await
            }
            "/cancel" => {
                // Destroys the session; a missing session behaves as Default.
                self.sessions.remove(user_id);
                debug!(user_id, "cancel command");
                self.sender.send_text(chat_id, "Cancelled.").await
            }
            other => {
                debug!(user_id, command = other, "unknown command ignored");
                Ok(())
            }
        }
    }

    async fn handle_text(
        &self,
        chat_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<(), LinkpostError> {
        let state = self.sessions.get(user_id).unwrap_or_default();
        match state.kind {
            SessionKind::Default => {
                debug!(user_id, "plain text outside a submission flow ignored");
                Ok(())
            }
            SessionKind::AwaitingLink => self.submit_link(chat_id, user_id, text).await,
        }
    }

    async fn submit_link(
        &self,
        chat_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<(), LinkpostError> {
        let raw = text.trim();
        if !looks_like_http_url(raw) {
            return self
                .sender
                .send_text(chat_id, "Please send a valid http(s) link.")
                .await;
        }

        let url = normalize_source_url(raw);
        match self.store.create_if_absent(&url).await {
            Ok(item) => {
                info!(user_id, id = item.id, url = %url, "link submitted");
                self.sender
                    .send_text(chat_id, "Accepted! The link is queued for processing.")
                    .await
            }
            Err(LinkpostError::Conflict(_)) => {
                debug!(user_id, url = %url, "duplicate submission");
                self.sender
                    .send_text(chat_id, "This link was already submitted.")
                    .await
            }
            Err(e) => {
                warn!(user_id, error = %e, "submission failed");
                self.sender.send_text(chat_id, e.user_message()).await
            }
        }
    }
}

/// Whether the input looks like an absolute HTTP(S) URL.
pub fn looks_like_http_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

/// Canonicalize a submission to the reader-page form used as the dedup key.
pub fn normalize_source_url(s: &str) -> String {
    s.replacen("/manga/", "/online/", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingSender, open_store, park_in_parsed};
    use linkpost_core::ItemStatus;
    use std::time::Duration;

    fn handler(
        store: Arc<dyn ContentStore>,
        sender: Arc<RecordingSender>,
    ) -> (InteractionHandler, Arc<SessionStore>) {
        let sessions = Arc::new(SessionStore::new(
            Duration::from_secs(60),
            Duration::from_secs(60),
        ));
        (
            InteractionHandler::new(store, Arc::clone(&sessions), sender),
            sessions,
        )
    }

    fn message(user_id: i64, text: &str) -> InboundUpdate {
        InboundUpdate::Message {
            chat_id: user_id,
            user_id,
            text: text.into(),
        }
    }

    #[test]
    fn url_validation() {
        assert!(looks_like_http_url("https://example.test/online/abc"));
        assert!(looks_like_http_url("http://example.test/x"));
        assert!(!looks_like_http_url("ftp://example.test/x"));
        assert!(!looks_like_http_url("example.test/online/abc"));
        assert!(!looks_like_http_url("just some words"));
    }

    #[test]
    fn source_url_normalization() {
        assert_eq!(
            normalize_source_url("https://example.test/manga/abc"),
            "https://example.test/online/abc"
        );
        assert_eq!(
            normalize_source_url("https://example.test/online/abc"),
            "https://example.test/online/abc"
        );
    }

    #[tokio::test]
    async fn start_enters_awaiting_link_and_greets() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, sessions) = handler(store, sender.clone());

        h.handle(message(1, "/start")).await;

        assert_eq!(sessions.get(1).unwrap().kind, SessionKind::AwaitingLink);
        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Send me a link"));
    }

    #[tokio::test]
    async fn cancel_destroys_the_session() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, sessions) = handler(store.clone(), sender.clone());

        h.handle(message(1, "/start")).await;
        h.handle(message(1, "/cancel")).await;

        assert!(sessions.get(1).is_none());

        // Post-cancel, submissions are ignored like in the Default state.
        h.handle(message(1, "https://example.test/online/post-cancel")).await;
        assert!(
            !store
                .exists_by_url("https://example.test/online/post-cancel")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn plain_text_outside_submission_flow_is_ignored() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, _sessions) = handler(store.clone(), sender.clone());

        h.handle(message(1, "https://example.test/online/abc")).await;

        assert!(sender.sent().await.is_empty());
        assert!(
            !store
                .exists_by_url("https://example.test/online/abc")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn invalid_link_is_rejected_before_any_side_effect() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, _sessions) = handler(store, sender.clone());

        h.handle(message(1, "/start")).await;
        h.handle(message(1, "definitely not a url")).await;

        let sent = sender.sent().await;
        assert!(sent.last().unwrap().text.contains("valid http(s) link"));
    }

    #[tokio::test]
    async fn valid_submission_creates_a_new_normalized_item() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, _sessions) = handler(store.clone(), sender.clone());

        h.handle(message(1, "/start")).await;
        h.handle(message(1, "https://example.test/manga/abc")).await;

        // The metadata-page form is canonicalized to the reader-page form.
        assert!(
            store
                .exists_by_url("https://example.test/online/abc")
                .await
                .unwrap()
        );
        assert!(sender.sent().await.last().unwrap().text.contains("Accepted"));
    }

    #[tokio::test]
    async fn duplicate_submission_gets_an_already_exists_reply() {
        let (store, _dir) = open_store().await;
        let sender = Arc::new(RecordingSender::new());
        let (h, _sessions) = handler(store.clone(), sender.clone());

        h.handle(message(1, "/start")).await;
        h.handle(message(1, "https://example.test/online/dup")).await;
        h.handle(message(1, "https://example.test/online/dup")).await;

        let sent = sender.sent().await;
        assert!(sent.last().unwrap().text.contains("already submitted"));

        let item = store
            .create_if_absent("https://example.test/online/dup")
            .await;
        assert!(item.is_err(), "still exactly one row for the URL");
    }

    #[tokio::test]
    async fn callbacks_are_routed_to_the_moderation_gateway() {
        let (store, _dir) = open_store().await;
        let id = park_in_parsed(&store, "https://example.test/online/cb").await;
        store.admin_add(7, "Admin").await.unwrap();

        let sender = Arc::new(RecordingSender::new());
        let (h, _sessions) = handler(store.clone(), sender.clone());

        h.handle(InboundUpdate::Callback {
            chat_id: 7,
            user_id: 7,
            data: format!("confirm:{id}"),
        })
        .await;

        assert_eq!(
            store.get_by_id(id).await.unwrap().status,
            ItemStatus::Confirmed
        );
    }
}
