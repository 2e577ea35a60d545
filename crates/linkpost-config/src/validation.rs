// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints serde attributes cannot express. Role
//! requirements (bot token, channel id, telegraph token) are checked by the
//! binary per subcommand, since the processor role does not need chat
//! credentials and vice versa.

use crate::diagnostic::ConfigError;
use crate::model::LinkpostConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all violations instead of failing fast.
pub fn validate_config(config: &LinkpostConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.scheduler.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.interval_secs must be greater than zero".to_string(),
        });
    }

    if config.pipeline.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.interval_secs must be greater than zero".to_string(),
        });
    }

    if config.session.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.ttl_secs must be greater than zero".to_string(),
        });
    }

    if config.session.sweep_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.sweep_interval_secs must be greater than zero".to_string(),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    if config.telegram.channel_id == Some(0) {
        errors.push(ConfigError::Validation {
            message: "telegram.channel_id must not be zero".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
