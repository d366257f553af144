// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential cryptography and access control for keyrack.
//!
//! The master password is never stored. Enrollment persists a salted PBKDF2
//! verification hash; the per-record encryption key is re-derived on every
//! request from the master password and a separate persisted salt, used
//! in-memory only, and dropped when the request completes.

pub mod crypto;
pub mod generate;
pub mod kdf;
pub mod policy;
pub mod service;

pub use generate::generate_password;
pub use policy::{normalize_label, validate_strength};
pub use service::VaultService;
