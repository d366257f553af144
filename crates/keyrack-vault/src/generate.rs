// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographically random password generation.

use rand::Rng;
use rand::rngs::OsRng;

/// ASCII letters, digits, and punctuation -- the full printable set minus
/// space.
const CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
      !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a random password of `length` characters.
///
/// Each position is drawn independently and uniformly from [`CHARSET`] using
/// the operating system CSPRNG.
pub fn generate_password(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate_password(16).len(), 16);
        assert_eq!(generate_password(1).len(), 1);
        assert_eq!(generate_password(64).len(), 64);
    }

    #[test]
    fn output_stays_within_charset() {
        let password = generate_password(256);
        for c in password.bytes() {
            assert!(CHARSET.contains(&c), "unexpected character {c:?}");
        }
    }

    #[test]
    fn consecutive_passwords_differ() {
        // 16 positions over ~90 symbols; a collision would be astronomical.
        assert_ne!(generate_password(16), generate_password(16));
    }

    #[test]
    fn charset_has_no_whitespace() {
        assert!(!CHARSET.contains(&b' '));
        assert!(!CHARSET.contains(&b'\n'));
    }
}
