// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use keyrack_core::KeyrackError;
use tracing::debug;

use crate::migrations;

/// Handle to the vault database: one `tokio_rusqlite::Connection` that is the
/// single writer for the whole process.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply PRAGMAs,
    /// and run any pending migrations.
    pub async fn open(path: &str) -> Result<Self, KeyrackError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| KeyrackError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations and one-time PRAGMAs run on a blocking connection before
        // the async writer takes over the file.
        let path_owned = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), KeyrackError> {
            let mut conn = rusqlite::Connection::open(&path_owned).map_err(map_sql_err)?;
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(map_sql_err)?;
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(map_sql_err)?;
            migrations::run_migrations(&mut conn)?;
            Ok(())
        })
        .await
        .map_err(|e| KeyrackError::Storage {
            source: Box::new(e),
        })??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_sql_err)?;

        // foreign_keys is per-connection, so it is applied on the writer.
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the database, flushing the WAL.
    pub async fn close(self) -> Result<(), KeyrackError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Convert tokio-rusqlite errors to KeyrackError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> KeyrackError {
    KeyrackError::Storage {
        source: Box::new(e),
    }
}

/// Convert plain rusqlite errors to KeyrackError::Storage.
pub(crate) fn map_sql_err(e: rusqlite::Error) -> KeyrackError {
    KeyrackError::Storage {
        source: Box::new(e),
    }
}
