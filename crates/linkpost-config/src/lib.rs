// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for linkpost.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`) and `LINKPOST_*` environment variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use linkpost_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::LinkpostConfig;

/// Load configuration and validate it.
///
/// 1. Loads config from `linkpost.toml` + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to one diagnostic per failed key
pub fn load_and_validate() -> Result<LinkpostConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<LinkpostConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
