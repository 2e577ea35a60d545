// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publication slot arithmetic.
//!
//! Posting is restricted to three fixed local times per day, evaluated in a
//! fixed civil UTC+3 offset regardless of server locale, so the result is
//! deterministic for identical input everywhere.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};

/// Civil offset of the broadcast audience's time zone. No DST.
const BROADCAST_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Daily publication hours, ascending, in broadcast-zone local time.
const SLOT_HOURS: [u32; 3] = [12, 17, 21];

fn broadcast_zone() -> FixedOffset {
    FixedOffset::east_opt(BROADCAST_UTC_OFFSET_SECS).expect("static offset")
}

/// The earliest publication slot strictly after `t`.
///
/// A `t` falling exactly on a slot maps to the next one (the boundary is
/// exclusive of itself). Pure and monotonic: `t1 <= t2` implies
/// `next_slot_after(t1) <= next_slot_after(t2)`.
pub fn next_slot_after(t: DateTime<Utc>) -> DateTime<Utc> {
    let zone = broadcast_zone();
    let local = t.with_timezone(&zone);
    let date = local.date_naive();

    for hour in SLOT_HOURS {
        let slot = zone
            .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, 0, 0)
            .single()
            .expect("fixed offset is unambiguous");
        if slot > local {
            return slot.with_timezone(&Utc);
        }
    }

    let tomorrow = date.succ_opt().expect("within calendar range");
    zone.with_ymd_and_hms(
        tomorrow.year(),
        tomorrow.month(),
        tomorrow.day(),
        SLOT_HOURS[0],
        0,
        0,
    )
    .single()
    .expect("fixed offset is unambiguous")
    .with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        broadcast_zone()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn as_local(t: DateTime<Utc>) -> DateTime<FixedOffset> {
        t.with_timezone(&broadcast_zone())
    }

    #[test]
    fn midday_input_maps_to_afternoon_slot() {
        let slot = as_local(next_slot_after(local(2026, 3, 1, 12, 30, 0)));
        assert_eq!((slot.day(), slot.hour(), slot.minute()), (1, 17, 0));
    }

    #[test]
    fn late_evening_rolls_to_next_day_noon() {
        let slot = as_local(next_slot_after(local(2026, 3, 1, 21, 30, 0)));
        assert_eq!((slot.day(), slot.hour()), (2, 12));
    }

    #[test]
    fn slot_boundary_is_exclusive_of_itself() {
        let slot = as_local(next_slot_after(local(2026, 3, 1, 12, 0, 0)));
        assert_eq!(slot.hour(), 17);

        let slot = as_local(next_slot_after(local(2026, 3, 1, 21, 0, 0)));
        assert_eq!((slot.day(), slot.hour()), (2, 12));
    }

    #[test]
    fn early_morning_maps_to_same_day_noon() {
        let slot = as_local(next_slot_after(local(2026, 3, 1, 3, 15, 0)));
        assert_eq!((slot.day(), slot.hour()), (1, 12));
    }

    #[test]
    fn evaluated_in_broadcast_zone_not_utc() {
        // 23:30 UTC is already 02:30 next day in the broadcast zone, so the
        // slot lands on that next local day's noon.
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let slot = as_local(next_slot_after(t));
        assert_eq!((slot.day(), slot.hour()), (2, 12));
    }

    #[test]
    fn deterministic_for_identical_input() {
        let t = local(2026, 3, 1, 14, 45, 12);
        assert_eq!(next_slot_after(t), next_slot_after(t));
    }

    #[test]
    fn monotonic_over_a_two_day_sweep() {
        let start = local(2026, 2, 28, 0, 0, 0);
        let mut prev = next_slot_after(start);
        for minutes in (0..2 * 24 * 60).step_by(17) {
            let t = start + chrono::Duration::minutes(minutes);
            let slot = next_slot_after(t);
            assert!(slot > t, "slot must be strictly after input");
            assert!(slot >= prev, "next_slot_after must be monotonic");
            prev = slot;
        }
    }

    #[test]
    fn year_boundary_rolls_over_cleanly() {
        let slot = as_local(next_slot_after(local(2026, 12, 31, 22, 0, 0)));
        assert_eq!((slot.year(), slot.month(), slot.day(), slot.hour()), (2027, 1, 1, 12));
    }
}
