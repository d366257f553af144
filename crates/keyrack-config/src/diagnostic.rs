// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Converts Figment deserialization errors and post-deserialization
//! validation failures into miette diagnostics rendered on stderr.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A TOML/env deserialization error (unknown key, wrong type, bad value).
    #[error("configuration error: {message}")]
    #[diagnostic(
        code(keyrack::config::parse),
        help("check keyrack.toml (or KEYRACK_* environment variables) against the documented sections: [server], [storage], [vault], [log]")
    )]
    Parse {
        /// Description of the deserialization failure.
        message: String,
    },

    /// A semantic validation error for a deserialized value.
    #[error("validation error: {message}")]
    #[diagnostic(code(keyrack::config::validation))]
    Validation {
        /// Description of the constraint violation.
        message: String,
    },
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// Figment collects multiple errors; each becomes its own diagnostic.
pub fn figment_to_config_errors(error: figment::Error) -> Vec<ConfigError> {
    error
        .into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: Vec<ConfigError>) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error));
    }
}
