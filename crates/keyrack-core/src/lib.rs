// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the keyrack password vault.
//!
//! This crate provides the error taxonomy and the domain types shared by the
//! storage, vault, and gateway crates. It contains no I/O and no crypto.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KeyrackError;
pub use types::{CreateOutcome, CredentialRecord, DecryptedCredential, Updated, VaultStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyrack_error_has_all_variants() {
        // Verify all 10 error variants exist and can be constructed.
        let _not_init = KeyrackError::NotInitialized;
        let _already = KeyrackError::AlreadyInitialized;
        let _auth = KeyrackError::Authentication;
        let _weak = KeyrackError::WeakPassword("too short".into());
        let _decrypt = KeyrackError::Decryption;
        let _not_found = KeyrackError::NotFound { id: 7 };
        let _storage = KeyrackError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _config = KeyrackError::Config("test".into());
        let _crypto = KeyrackError::Crypto("test".into());
        let _internal = KeyrackError::Internal("test".into());
    }

    #[test]
    fn authentication_error_message_is_generic() {
        // The rendered message must not hint at which check failed.
        let msg = KeyrackError::Authentication.to_string();
        assert_eq!(msg, "wrong master password");

        let msg = KeyrackError::Decryption.to_string();
        assert_eq!(msg, "decryption error");
    }

    #[test]
    fn not_found_carries_the_id() {
        let msg = KeyrackError::NotFound { id: 42 }.to_string();
        assert!(msg.contains("42"));
    }

    #[test]
    fn decrypted_credential_debug_redacts_password() {
        let cred = DecryptedCredential {
            id: 1,
            app_name: "Gmail".into(),
            username: "a@b.com".into(),
            created_by: "Alice".into(),
            password: "Hunter2!".into(),
        };
        let debug = format!("{cred:?}");
        assert!(!debug.contains("Hunter2!"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn create_outcome_variants() {
        let created = CreateOutcome::Created {
            id: 1,
            generated_password: Some("p".into()),
        };
        let duplicate = CreateOutcome::Duplicate {
            existing_id: 1,
            app_name: "Gmail".into(),
            username: "a@b.com".into(),
            created_by: "Alice".into(),
        };
        assert_ne!(
            std::mem::discriminant(&created),
            std::mem::discriminant(&duplicate)
        );
    }
}
