// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 derivation from the master password.
//!
//! Two outputs of the same KDF family, kept deliberately separate:
//! - a salted verification hash (`hash_master_password` / `verify_master_password`)
//!   used only to answer "is this the right master password";
//! - a 32-byte symmetric key (`derive_encryption_key`) re-derivable from the
//!   master password plus the persisted encryption salt.
//!
//! The iteration count is high enough to resist offline brute force; it is
//! configurable and defaults to 480_000 via `VaultConfig`.

use std::num::NonZeroU32;

use keyrack_core::KeyrackError;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of the random salt prefixing a stored verification hash.
pub const AUTH_SALT_LEN: usize = 32;

/// Length of the verification value derived from the master password.
pub const VERIFIER_LEN: usize = 64;

/// Length of the derived symmetric encryption key.
pub const KEY_LEN: usize = 32;

/// Length of the vault-wide encryption salt persisted in the config table.
pub const ENCRYPTION_SALT_LEN: usize = 16;

/// Derive the 32-byte record encryption key from the master password and the
/// persisted encryption salt.
///
/// Deterministic: the same inputs always produce the same key. The returned
/// key is wrapped in [`Zeroizing`] so it is wiped from memory on drop.
pub fn derive_encryption_key(
    master_password: &[u8],
    salt: &[u8],
    iterations: NonZeroU32,
) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        master_password,
        key.as_mut(),
    );
    key
}

/// Hash the master password for enrollment.
///
/// Generates a fresh random 32-byte salt, derives a 64-byte verification
/// value, and returns `salt || verifier` as one opaque blob. Each call
/// produces a different blob even for the same password.
pub fn hash_master_password(
    master_password: &[u8],
    iterations: NonZeroU32,
) -> Result<Vec<u8>, KeyrackError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; AUTH_SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| KeyrackError::Crypto("failed to generate random salt".to_string()))?;

    let mut verifier = Zeroizing::new([0u8; VERIFIER_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        master_password,
        verifier.as_mut(),
    );

    let mut blob = Vec::with_capacity(AUTH_SALT_LEN + VERIFIER_LEN);
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&verifier[..]);
    Ok(blob)
}

/// Check a candidate master password against a stored `salt || verifier` blob.
///
/// Fails closed: a malformed blob (too short to contain a verifier) is simply
/// "not equal". The comparison itself is constant-time via `ring`.
pub fn verify_master_password(
    candidate: &[u8],
    stored_hash: &[u8],
    iterations: NonZeroU32,
) -> bool {
    if stored_hash.len() <= AUTH_SALT_LEN {
        return false;
    }
    let (salt, verifier) = stored_hash.split_at(AUTH_SALT_LEN);
    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        candidate,
        verifier,
    )
    .is_ok()
}

/// Generate the random 16-byte vault-wide encryption salt.
///
/// Called at most once per vault; the persisted value wins over any later
/// candidate.
pub fn generate_encryption_salt() -> Result<[u8; ENCRYPTION_SALT_LEN], KeyrackError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; ENCRYPTION_SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| KeyrackError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}
