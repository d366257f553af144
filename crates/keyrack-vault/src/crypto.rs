// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG; nonce reuse would be catastrophic for GCM security. The nonce is
//! prepended to the output so a blob is self-contained: only the blob and the
//! key are needed to decrypt.

use keyrack_core::KeyrackError;
use ring::aead::{Aad, AES_256_GCM, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of the GCM nonce prefixing every sealed blob.
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag trailing every sealed blob.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext with AES-256-GCM under a random 96-bit nonce.
///
/// Returns `nonce || ciphertext || tag`. Non-deterministic: sealing the same
/// plaintext twice under the same key yields different blobs.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, KeyrackError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeyrackError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| KeyrackError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeyrackError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&in_out);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// Fails with [`KeyrackError::Decryption`] when the blob is truncated, was not
/// produced under `key`, or was tampered with. Never returns garbage
/// plaintext: the integrity check runs before any bytes are released.
pub fn open(key: &[u8; 32], blob: &[u8]) -> Result<Vec<u8>, KeyrackError> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(KeyrackError::Decryption);
    }
    let unbound =
        UnboundKey::new(&AES_256_GCM, key).map_err(|_| KeyrackError::Decryption)?;
    let less_safe = LessSafeKey::new(unbound);

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce =
        Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| KeyrackError::Decryption)?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeyrackError::Decryption)?;

    Ok(plaintext.to_vec())
}
