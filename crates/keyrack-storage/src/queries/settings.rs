// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value config storage, holding at least the encryption salt.

use keyrack_core::KeyrackError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Config key under which the vault-wide encryption salt is stored.
pub const ENCRYPTION_SALT_KEY: &str = "encryption_salt";

/// Fetch a config value by key.
pub async fn get_value(db: &Database, key: &str) -> Result<Option<Vec<u8>>, KeyrackError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Store `candidate` under `key` unless a value already exists, and return
/// the persisted value either way.
///
/// The insert-or-keep and the read-back run in one transaction: a value is
/// written exactly once per key and the first write wins, which is what keeps
/// all records encrypted under keys derived from a single salt.
pub async fn ensure_value(
    db: &Database,
    key: &str,
    candidate: Vec<u8>,
) -> Result<Vec<u8>, KeyrackError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<u8>, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO config (key, value) VALUES (?1, ?2)",
                params![key, candidate],
            )?;
            let value: Vec<u8> = tx.query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .map_err(map_tr_err)
}
