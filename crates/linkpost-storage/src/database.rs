// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access goes through tokio-rusqlite's single background thread, which
//! serializes statements within one process. Cross-process exclusivity (the
//! claim protocol) relies on SQLite's own file locking plus immediate
//! transactions, not on anything in-process.

use std::path::Path;

use linkpost_core::LinkpostError;
use tracing::debug;

/// Handle to the linkpost SQLite database.
///
/// Cheap to clone; all clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs, and
    /// run pending migrations.
    pub async fn open(path: &str) -> Result<Self, LinkpostError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| LinkpostError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations run on a short-lived blocking connection before the
        // async handle opens; refinery needs `&mut rusqlite::Connection`.
        {
            let mut bootstrap =
                rusqlite::Connection::open(path).map_err(|e| LinkpostError::Storage {
                    source: Box::new(e),
                })?;
            apply_pragmas(&bootstrap)?;
            crate::migrations::run_migrations(&mut bootstrap)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| LinkpostError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the shared connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection thread.
    pub async fn close(self) -> Result<(), LinkpostError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| LinkpostError::Storage {
            source: format!("close failed: {e}").into(),
        })?;
        debug!("database closed");
        Ok(())
    }
}

fn apply_pragmas(conn: &rusqlite::Connection) -> Result<(), LinkpostError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;
         PRAGMA foreign_keys = ON;",
    )
    .map_err(|e| LinkpostError::Storage {
        source: Box::new(e),
    })
}

/// Convert tokio-rusqlite errors to [`LinkpostError::Storage`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LinkpostError {
    LinkpostError::Storage {
        source: Box::new(e),
    }
}
