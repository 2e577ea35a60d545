// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content item lifecycle operations.
//!
//! Every status transition is a single conditional UPDATE guarded by the
//! expected current status; zero rows affected means the item is missing or
//! not in the expected state, which callers receive as `NotFound`. The claim
//! operation wraps select-and-flip in an immediate transaction so exclusivity
//! holds across concurrent claimants and across processes.

use chrono::{DateTime, Utc};
use linkpost_core::LinkpostError;
use linkpost_core::types::{ContentItem, ItemMeta, ItemStatus};
use rusqlite::params;

use crate::database::Database;
use crate::models::{self, ITEM_COLUMNS};

/// Insert a `new` item keyed by URL.
///
/// A unique-constraint violation on `source_url` maps to
/// [`LinkpostError::Conflict`]; no row is written in that case.
pub async fn create_if_absent(
    db: &Database,
    source_url: &str,
) -> Result<ContentItem, LinkpostError> {
    let url = source_url.to_string();
    let created = db
        .connection()
        .call(move |conn| -> Result<Option<ContentItem>, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT INTO items (source_url) VALUES (?1)",
                params![url],
            );
            match inserted {
                Ok(_) => {
                    let id = conn.last_insert_rowid();
                    let item = conn.query_row(
                        &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
                        params![id],
                        models::item_from_row,
                    )?;
                    Ok(Some(item))
                }
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    created.ok_or_else(|| {
        LinkpostError::Conflict(format!("source URL already tracked: {source_url}"))
    })
}

/// Whether any item tracks the given source URL.
pub async fn exists_by_url(db: &Database, source_url: &str) -> Result<bool, LinkpostError> {
    let url = source_url.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM items WHERE source_url = ?1",
                params![url],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch an item by id.
pub async fn get_by_id(db: &Database, id: i64) -> Result<ContentItem, LinkpostError> {
    let found = db
        .connection()
        .call(move |conn| -> Result<Option<ContentItem>, rusqlite::Error> {
            let result = conn.query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
                params![id],
                models::item_from_row,
            );
            match result {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    found.ok_or_else(|| LinkpostError::NotFound(format!("item {id}")))
}

/// Atomically claim the oldest `new` item, flipping it to `processing`.
///
/// Select and flip run inside one immediate transaction; a concurrent
/// claimant either sees a different row or none at all. The UPDATE keeps a
/// `status = 'new'` predicate and checks rows-affected as the compare-and-swap.
pub async fn claim_one_new(db: &Database) -> Result<Option<ContentItem>, LinkpostError> {
    db.connection()
        .call(|conn| -> Result<Option<ContentItem>, rusqlite::Error> {
            let tx = conn
                .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

            let oldest = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM items
                     WHERE status = 'new' ORDER BY id ASC LIMIT 1"
                ))?;
                match stmt.query_row([], models::item_from_row) {
                    Ok(item) => Some(item),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e),
                }
            };

            let Some(mut item) = oldest else {
                tx.commit()?;
                return Ok(None);
            };

            let flipped = tx.execute(
                "UPDATE items SET status = 'processing',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'new'",
                params![item.id],
            )?;
            tx.commit()?;

            if flipped == 1 {
                item.status = ItemStatus::Processing;
                Ok(Some(item))
            } else {
                // Lost a race that the immediate transaction should preclude;
                // report empty and let the next tick retry.
                Ok(None)
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Merge enrichment fields into an item without touching its status.
pub async fn update_meta(db: &Database, id: i64, meta: &ItemMeta) -> Result<(), LinkpostError> {
    let tags_json = serde_json::to_string(&meta.tags).map_err(|e| LinkpostError::Storage {
        source: Box::new(e),
    })?;
    let meta = meta.clone();
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET name = ?1, series = ?2, author = ?3, translator = ?4,
                 tags = ?5, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?6",
                params![meta.name, meta.series, meta.author, meta.translator, tags_json, id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// `processing` -> `parsed` with the published page URL and draft schedule.
pub async fn mark_parsed(
    db: &Database,
    id: i64,
    page_url: &str,
    scheduled_at: DateTime<Utc>,
) -> Result<(), LinkpostError> {
    let page_url = page_url.to_string();
    let when = models::format_ts(scheduled_at);
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET status = 'parsed', page_url = ?1, scheduled_at = ?2,
                 last_error = '', updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3 AND status = 'processing'",
                params![page_url, when, id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// Record that a moderation prompt was dispatched for this item.
pub async fn mark_review_sent(db: &Database, id: i64) -> Result<(), LinkpostError> {
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET review_sent_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'parsed'",
                params![id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// `parsed` -> `confirmed` with the final schedule time.
pub async fn mark_confirmed(
    db: &Database,
    id: i64,
    when: DateTime<Utc>,
) -> Result<(), LinkpostError> {
    let when = models::format_ts(when);
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET status = 'confirmed', scheduled_at = ?1, last_error = '',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND status = 'parsed'",
                params![when, id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// `parsed` -> `cancelled`.
pub async fn mark_cancelled(db: &Database, id: i64) -> Result<(), LinkpostError> {
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET status = 'cancelled', last_error = '',
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'parsed'",
                params![id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// `confirmed` -> `sent`, stamping the dispatch time.
pub async fn mark_sent(db: &Database, id: i64) -> Result<(), LinkpostError> {
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET status = 'sent', last_error = '',
                 sent_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now'),
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'confirmed'",
                params![id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// Any state -> `error` with a diagnostic message.
///
/// Unguarded by status: a malformed item is marked errored from wherever it
/// was found.
pub async fn mark_error(db: &Database, id: i64, message: &str) -> Result<(), LinkpostError> {
    let message = message.to_string();
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE items SET status = 'error', last_error = ?1,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![message, id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    require_row(updated, id)
}

/// `parsed` items with no review prompt sent yet, oldest first.
pub async fn find_parsed_pending_review(
    db: &Database,
    limit: u32,
) -> Result<Vec<ContentItem>, LinkpostError> {
    db.connection()
        .call(move |conn| -> Result<Vec<ContentItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE status = 'parsed' AND review_sent_at IS NULL
                 ORDER BY created_at ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], models::item_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// `confirmed` items whose schedule has elapsed, earliest first.
pub async fn find_due(
    db: &Database,
    limit: u32,
    now: DateTime<Utc>,
) -> Result<Vec<ContentItem>, LinkpostError> {
    let now = models::format_ts(now);
    db.connection()
        .call(move |conn| -> Result<Vec<ContentItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE status = 'confirmed' AND scheduled_at IS NOT NULL AND scheduled_at <= ?1
                 ORDER BY scheduled_at ASC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![now, limit], models::item_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recent `scheduled_at` among `confirmed` items.
pub async fn last_scheduled_at(db: &Database) -> Result<Option<DateTime<Utc>>, LinkpostError> {
    let raw = db
        .connection()
        .call(|conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT MAX(scheduled_at) FROM items WHERE status = 'confirmed'",
                [],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match raw {
        None => Ok(None),
        Some(s) => models::parse_ts(&s)
            .map(Some)
            .ok_or_else(|| LinkpostError::Storage {
                source: format!("unparseable scheduled_at: {s}").into(),
            }),
    }
}

fn require_row(updated: usize, id: i64) -> Result<(), LinkpostError> {
    if updated == 1 {
        Ok(())
    } else {
        Err(LinkpostError::NotFound(format!(
            "item {id} missing or not in the expected state"
        )))
    }
}
