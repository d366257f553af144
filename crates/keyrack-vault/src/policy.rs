// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization and password-strength policy.
//!
//! Normalization is not cosmetic: the duplicate-detection invariant compares
//! normalized app names, so the same pure function must be applied before
//! both comparison and storage.

use keyrack_core::KeyrackError;

/// Punctuation characters accepted as "special" by the strength rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length accepted by the strength rule.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Normalize a display label: first character uppercased, remainder lowercased.
///
/// Applied to `app_name` and `created_by` before comparison and storage.
pub fn normalize_label(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Validate a password against the strength rule: at least 8 characters, at
/// least one ASCII uppercase letter, at least one of [`SPECIAL_CHARACTERS`].
pub fn validate_strength(password: &str) -> Result<(), KeyrackError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(KeyrackError::WeakPassword(
            "must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(KeyrackError::WeakPassword(
            "must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(KeyrackError::WeakPassword(
            "must contain at least one special character".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_capitalizes_first_letter() {
        assert_eq!(normalize_label("gmail"), "Gmail");
        assert_eq!(normalize_label("alice"), "Alice");
    }

    #[test]
    fn normalize_lowercases_the_rest() {
        assert_eq!(normalize_label("GMAIL"), "Gmail");
        assert_eq!(normalize_label("gMaIl"), "Gmail");
    }

    #[test]
    fn normalize_is_idempotent() {
        assert_eq!(normalize_label(&normalize_label("gitHub")), "Github");
    }

    #[test]
    fn normalize_handles_edge_inputs() {
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("x"), "X");
        assert_eq!(normalize_label("7zip"), "7zip");
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_strength("Abcdef1!").is_ok());
        assert!(validate_strength("Sup3r,Long.Passw0rd").is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let err = validate_strength("Ab1!").unwrap_err();
        assert!(matches!(err, KeyrackError::WeakPassword(_)));
    }

    #[test]
    fn missing_uppercase_is_rejected() {
        let err = validate_strength("alllowercase!").unwrap_err();
        assert!(matches!(err, KeyrackError::WeakPassword(_)));
    }

    #[test]
    fn missing_special_character_is_rejected() {
        let err = validate_strength("NoSpecials1").unwrap_err();
        assert!(matches!(err, KeyrackError::WeakPassword(_)));
    }

    #[test]
    fn special_set_matches_the_documented_rule() {
        for c in SPECIAL_CHARACTERS.chars() {
            let candidate = format!("Abcdefg{c}");
            assert!(
                validate_strength(&candidate).is_ok(),
                "{c} should count as special"
            );
        }
        // Characters outside the fixed set do not count.
        assert!(validate_strength("Abcdefg-").is_err());
        assert!(validate_strength("Abcdefg_").is_err());
    }
}
