// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for linkpost.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup instead of silently ignoring typos.

use serde::{Deserialize, Serialize};

/// Top-level linkpost configuration.
///
/// Loaded from an optional `linkpost.toml` with `LINKPOST_*` environment
/// variable overrides. Every section defaults to sensible values; only the
/// credentials a given role actually needs are validated at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinkpostConfig {
    /// Service-wide settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Chat-platform settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Publication scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Enrichment pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Interaction session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Page-publisher settings.
    #[serde(default)]
    pub telegraph: TelegraphConfig,
}

/// Service-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Chat-platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. Required by the `bot` role.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Broadcast channel id posts are dispatched to. Required by the `bot` role.
    #[serde(default)]
    pub channel_id: Option<i64>,

    /// Long-poll timeout in seconds for `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            channel_id: None,
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

fn default_poll_timeout_secs() -> u32 {
    25
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. Shared by all role processes.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("linkpost").join("linkpost.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("linkpost.db"))
        .to_string_lossy()
        .into_owned()
}

/// Publication scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Tick interval in seconds.
    #[serde(default = "default_scheduler_interval_secs")]
    pub interval_secs: u64,

    /// Maximum parsed items surfaced for review per tick.
    #[serde(default = "default_review_batch")]
    pub review_batch: u32,

    /// Maximum due items dispatched per tick.
    #[serde(default = "default_dispatch_batch")]
    pub dispatch_batch: u32,

    /// Optional subscribe link appended to broadcast posts.
    #[serde(default)]
    pub subscribe_url: Option<String>,

    /// Anchor text for the subscribe link.
    #[serde(default = "default_subscribe_label")]
    pub subscribe_label: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_scheduler_interval_secs(),
            review_batch: default_review_batch(),
            dispatch_batch: default_dispatch_batch(),
            subscribe_url: None,
            subscribe_label: default_subscribe_label(),
        }
    }
}

fn default_scheduler_interval_secs() -> u64 {
    10
}

fn default_review_batch() -> u32 {
    10
}

fn default_dispatch_batch() -> u32 {
    5
}

fn default_subscribe_label() -> String {
    "Subscribe".to_string()
}

/// Enrichment pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Poll interval in seconds between claim attempts.
    #[serde(default = "default_pipeline_interval_secs")]
    pub interval_secs: u64,

    /// HTTP timeout in seconds for scrape fetches.
    #[serde(default = "default_scrape_timeout_secs")]
    pub scrape_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_pipeline_interval_secs(),
            scrape_timeout_secs: default_scrape_timeout_secs(),
        }
    }
}

fn default_pipeline_interval_secs() -> u64 {
    2
}

fn default_scrape_timeout_secs() -> u64 {
    15
}

/// Interaction session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Idle time after which a session expires.
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,

    /// Interval between expiry sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_sweep_interval_secs() -> u64 {
    600
}

/// Page-publisher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegraphConfig {
    /// telegra.ph access token. Required by the `processor` role.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Author name stamped on created pages.
    #[serde(default)]
    pub author_name: String,

    /// Author URL stamped on created pages.
    #[serde(default)]
    pub author_url: String,

    /// HTTP timeout in seconds for page creation.
    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,
}

impl Default for TelegraphConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            author_name: String::new(),
            author_url: String::new(),
            publish_timeout_secs: default_publish_timeout_secs(),
        }
    }
}

fn default_publish_timeout_secs() -> u64 {
    20
}
