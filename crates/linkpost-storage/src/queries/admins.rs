// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrator lookups and CLI provisioning.

use linkpost_core::LinkpostError;
use linkpost_core::types::Administrator;
use rusqlite::params;

use crate::database::Database;
use crate::models;

/// Whether the given platform user id is a registered administrator.
pub async fn admin_exists(db: &Database, user_id: i64) -> Result<bool, LinkpostError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM administrators WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All registered administrators.
pub async fn admin_list(db: &Database) -> Result<Vec<Administrator>, LinkpostError> {
    db.connection()
        .call(|conn| -> Result<Vec<Administrator>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT user_id, display_name, created_at FROM administrators
                 ORDER BY user_id ASC",
            )?;
            let rows = stmt.query_map([], models::admin_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert an administrator; re-adding an existing id updates the name.
pub async fn admin_add(
    db: &Database,
    user_id: i64,
    display_name: &str,
) -> Result<(), LinkpostError> {
    let display_name = display_name.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO administrators (user_id, display_name) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO UPDATE SET display_name = excluded.display_name",
                params![user_id, display_name],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
