// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record CRUD operations.
//!
//! This layer stores whatever normalized names and ciphertext the service
//! hands it; it enforces no policy of its own. The one structural guarantee
//! it gives is [`insert_credential`]'s atomic duplicate-check-then-insert.

use keyrack_core::KeyrackError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::CredentialRecord;

/// Outcome of an insert attempt: the new row id, or the record that already
/// occupies the (app_name, username) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate(CredentialRecord),
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<CredentialRecord, rusqlite::Error> {
    Ok(CredentialRecord {
        id: row.get(0)?,
        app_name: row.get(1)?,
        username: row.get(2)?,
        created_by: row.get(3)?,
        encrypted_password: row.get(4)?,
    })
}

const SELECT_COLUMNS: &str = "id, app_name, username, created_by, encrypted_password";

/// Insert a credential unless the (app_name, username) pair is already taken.
///
/// The duplicate check and the insert run inside one transaction on the
/// single writer connection, so two concurrent creations for the same pair
/// cannot both observe "no existing record".
pub async fn insert_credential(
    db: &Database,
    app_name: &str,
    username: &str,
    created_by: &str,
    encrypted_password: Vec<u8>,
) -> Result<InsertOutcome, KeyrackError> {
    let app_name = app_name.to_string();
    let username = username.to_string();
    let created_by = created_by.to_string();
    db.connection()
        .call(move |conn| -> Result<InsertOutcome, rusqlite::Error> {
            let tx = conn.transaction()?;
            let existing = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM credentials
                     WHERE app_name = ?1 AND username = ?2"
                ))?;
                match stmt.query_row(params![app_name, username], row_to_record) {
                    Ok(record) => Some(record),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e),
                }
            };
            if let Some(record) = existing {
                return Ok(InsertOutcome::Duplicate(record));
            }
            tx.execute(
                "INSERT INTO credentials (app_name, username, created_by, encrypted_password)
                 VALUES (?1, ?2, ?3, ?4)",
                params![app_name, username, created_by, encrypted_password],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(InsertOutcome::Inserted(id))
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a credential by the (app_name, username) pair.
pub async fn find_by_app_and_username(
    db: &Database,
    app_name: &str,
    username: &str,
) -> Result<Option<CredentialRecord>, KeyrackError> {
    let app_name = app_name.to_string();
    let username = username.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM credentials
                 WHERE app_name = ?1 AND username = ?2"
            ))?;
            match stmt.query_row(params![app_name, username], row_to_record) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get a credential by id.
pub async fn get_credential(
    db: &Database,
    id: i64,
) -> Result<Option<CredentialRecord>, KeyrackError> {
    db.connection()
        .call(move |conn| -> Result<Option<CredentialRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM credentials WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], row_to_record) {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List credentials, optionally filtered by exact app_name match.
pub async fn list_credentials(
    db: &Database,
    app_name: Option<&str>,
) -> Result<Vec<CredentialRecord>, KeyrackError> {
    let app_name = app_name.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> Result<Vec<CredentialRecord>, rusqlite::Error> {
            let mut records = Vec::new();
            match &app_name {
                Some(filter) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM credentials
                         WHERE app_name = ?1 ORDER BY id"
                    ))?;
                    let rows = stmt.query_map(params![filter], row_to_record)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {SELECT_COLUMNS} FROM credentials ORDER BY id"
                    ))?;
                    let rows = stmt.query_map([], row_to_record)?;
                    for row in rows {
                        records.push(row?);
                    }
                }
            }
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}

/// List the distinct app names across all credentials, sorted.
pub async fn list_app_names(db: &Database) -> Result<Vec<String>, KeyrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT DISTINCT app_name FROM credentials ORDER BY app_name")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            let mut names = Vec::new();
            for row in rows {
                names.push(row?);
            }
            Ok(names)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the encrypted password of an existing credential in place.
///
/// Returns `false` when no row has the given id.
pub async fn update_password(
    db: &Database,
    id: i64,
    encrypted_password: Vec<u8>,
) -> Result<bool, KeyrackError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE credentials SET encrypted_password = ?1 WHERE id = ?2",
                params![encrypted_password, id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a credential by id. Returns `false` when no row had the given id.
pub async fn delete_credential(db: &Database, id: i64) -> Result<bool, KeyrackError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let changed = conn.execute("DELETE FROM credentials WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
