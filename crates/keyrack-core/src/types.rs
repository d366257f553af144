// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the keyrack crates.

/// A stored credential row as persisted: the password is opaque ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Store-assigned id, stable for the lifetime of the record.
    pub id: i64,
    /// Display name of the application, first letter capitalized by policy.
    pub app_name: String,
    pub username: String,
    /// Author label, capitalized by policy. Excluded from the uniqueness check.
    pub created_by: String,
    /// Self-contained AES-256-GCM blob: nonce || ciphertext || tag.
    pub encrypted_password: Vec<u8>,
}

/// A credential with its password decrypted for a single response.
///
/// Debug output omits the password.
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptedCredential {
    pub id: i64,
    pub app_name: String,
    pub username: String,
    pub created_by: String,
    pub password: String,
}

impl std::fmt::Debug for DecryptedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedCredential")
            .field("id", &self.id)
            .field("app_name", &self.app_name)
            .field("username", &self.username)
            .field("created_by", &self.created_by)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Whether the vault has been enrolled with a master password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultStatus {
    pub is_initialized: bool,
}

/// Outcome of a credential creation attempt.
///
/// `Duplicate` is a result, not an error: the transport layer surfaces it so
/// a caller can offer "update instead" without having mutated anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created {
        id: i64,
        /// Present only when the service generated the password; this is the
        /// one and only time it is returned in plaintext.
        generated_password: Option<String>,
    },
    Duplicate {
        existing_id: i64,
        app_name: String,
        username: String,
        created_by: String,
    },
}

/// Outcome of a successful credential password replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Updated {
    pub id: i64,
    /// Present only when the service generated the replacement password.
    pub generated_password: Option<String>,
}
