// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error rendering.

/// A configuration problem found at load or validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Figment failed to parse or merge the sources.
    Parse { message: String },
    /// The config deserialized but a semantic constraint was violated.
    Validation { message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse { message } => write!(f, "config parse error: {message}"),
            ConfigError::Validation { message } => write!(f, "config error: {message}"),
        }
    }
}

/// Print all collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("linkpost: {error}");
    }
}

/// Convert a figment extraction error into config errors, one per figment
/// diagnostic.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}
