// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order: compiled defaults, then `./linkpost.toml`, then `LINKPOST_*`
//! environment variables (environment wins, so deployments can run with no
//! config file at all).

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LinkpostConfig;

/// Load configuration from the local TOML file with env var overrides.
pub fn load_config() -> Result<LinkpostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LinkpostConfig::default()))
        .merge(Toml::file("linkpost.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LinkpostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LinkpostConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LinkpostConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LinkpostConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LINKPOST_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("LINKPOST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LINKPOST_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("scheduler_", "scheduler.", 1)
            .replacen("pipeline_", "pipeline.", 1)
            .replacen("session_", "session.", 1)
            .replacen("telegraph_", "telegraph.", 1);
        mapped.into()
    })
}
