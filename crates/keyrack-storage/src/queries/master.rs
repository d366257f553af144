// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-password hash storage.
//!
//! The table holds at most one row; absence means the vault is not
//! initialized. The hash blob is opaque to this layer.

use keyrack_core::KeyrackError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Fetch the stored master-password hash, if any.
pub async fn get_password_hash(db: &Database) -> Result<Option<Vec<u8>>, KeyrackError> {
    db.connection()
        .call(|conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT password_hash FROM master_password LIMIT 1",
                [],
                |row| row.get(0),
            );
            match result {
                Ok(hash) => Ok(Some(hash)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Store the master-password hash, but only if none exists yet.
///
/// The existence check and the insert run in one transaction, so two
/// concurrent enrollments cannot both succeed. Returns `false` when a hash
/// was already present (nothing written).
pub async fn insert_password_hash(db: &Database, hash: Vec<u8>) -> Result<bool, KeyrackError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction()?;
            let existing: i64 =
                tx.query_row("SELECT COUNT(*) FROM master_password", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(false);
            }
            tx.execute(
                "INSERT INTO master_password (password_hash) VALUES (?1)",
                params![hash],
            )?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}
