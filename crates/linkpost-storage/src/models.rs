// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping and timestamp helpers for storage entities.
//!
//! The canonical types live in `linkpost-core::types`; this module maps
//! SQLite rows into them and keeps the timestamp format in one place.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use linkpost_core::types::{Administrator, ContentItem, ItemStatus};

pub use linkpost_core::types::ItemMeta;

/// Column list matching [`item_from_row`]'s positional reads.
pub(crate) const ITEM_COLUMNS: &str = "id, source_url, name, series, author, translator, tags, \
     page_url, status, last_error, scheduled_at, review_sent_at, sent_at, created_at, updated_at";

/// Timestamp format stored in the database: RFC 3339 UTC with millisecond
/// precision, identical to SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`,
/// so string comparison orders chronologically.
const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a timestamp the way the database stores them.
pub fn format_ts(t: DateTime<Utc>) -> String {
    t.format(TS_FORMAT).to_string()
}

/// Parse a stored timestamp back into `DateTime<Utc>`.
pub fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Map one `items` row (selected with [`ITEM_COLUMNS`]) into a [`ContentItem`].
pub(crate) fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentItem> {
    let status_raw: String = row.get(8)?;
    let status = ItemStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let tags_raw: String = row.get(6)?;
    let tags: Vec<String> = serde_json::from_str(&tags_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ContentItem {
        id: row.get(0)?,
        source_url: row.get(1)?,
        name: row.get(2)?,
        series: row.get(3)?,
        author: row.get(4)?,
        translator: row.get(5)?,
        tags,
        page_url: row.get(7)?,
        status,
        last_error: row.get(9)?,
        scheduled_at: row.get(10)?,
        review_sent_at: row.get(11)?,
        sent_at: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Map one `administrators` row into an [`Administrator`].
pub(crate) fn admin_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Administrator> {
    Ok(Administrator {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_matches_sqlite_strftime_shape() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 15).unwrap();
        assert_eq!(format_ts(t), "2026-03-01T09:30:15.000Z");
    }

    #[test]
    fn parse_round_trips() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 15).unwrap();
        assert_eq!(parse_ts(&format_ts(t)), Some(t));
    }

    #[test]
    fn formatted_timestamps_order_lexicographically() {
        let early = format_ts(Utc.with_ymd_and_hms(2026, 3, 1, 11, 59, 59).unwrap());
        let late = format_ts(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        assert!(early < late);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ts("not-a-timestamp").is_none());
    }
}
