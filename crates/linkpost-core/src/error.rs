// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the linkpost workspace.

use thiserror::Error;

/// The primary error type used across all linkpost crates.
#[derive(Debug, Error)]
pub enum LinkpostError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or rejected input, caught before any side effect.
    #[error("validation error: {0}")]
    Validation(String),

    /// An item with the same source URL already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure talking to an external collaborator.
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A collaborator answered, but with a non-success payload.
    #[error("upstream API error: {message}")]
    UpstreamApi { message: String },

    /// Storage backend errors (connection, query failure, conversion).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LinkpostError {
    /// Plain-language text safe to show to an end user.
    ///
    /// Internal diagnostics (storage errors, upstream payloads) are never
    /// surfaced verbatim.
    pub fn user_message(&self) -> &'static str {
        match self {
            LinkpostError::Validation(_) => "Please check the input and try again.",
            LinkpostError::Conflict(_) => "This link was already submitted.",
            LinkpostError::NotFound(_) => "That record no longer exists.",
            LinkpostError::Config(_) => "The service is misconfigured.",
            LinkpostError::Network { .. } | LinkpostError::UpstreamApi { .. } => {
                "An external service is unavailable, try again later."
            }
            LinkpostError::Storage { .. } => "Something went wrong, try again later.",
        }
    }

    /// Shorthand for a [`LinkpostError::Network`] without an underlying cause.
    pub fn network(message: impl Into<String>) -> Self {
        LinkpostError::Network {
            message: message.into(),
            source: None,
        }
    }
}
