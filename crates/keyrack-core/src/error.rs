// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the keyrack password vault.

use thiserror::Error;

/// The primary error type used across all keyrack crates.
///
/// Authentication and decryption failures render deliberately generic
/// messages: the caller must not be able to tell a wrong password apart from
/// a corrupt hash or tampered ciphertext.
#[derive(Debug, Error)]
pub enum KeyrackError {
    /// No master password has been enrolled yet.
    #[error("vault is not initialized")]
    NotInitialized,

    /// A master password already exists; enrollment is a one-time operation.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// Master password verification failed.
    #[error("wrong master password")]
    Authentication,

    /// A password failed the strength rule (length / uppercase / punctuation).
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Ciphertext could not be authenticated and decrypted under the derived key.
    #[error("decryption error")]
    Decryption,

    /// No credential record with the given id.
    #[error("credential {id} not found")]
    NotFound { id: i64 },

    /// Storage backend errors (database connection, query failure, commit).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid values reaching the service layer).
    #[error("configuration error: {0}")]
    Config(String),

    /// Cryptographic primitive failures (RNG, cipher setup).
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Internal or unexpected errors (server bind, transport failure).
    #[error("internal error: {0}")]
    Internal(String),
}
