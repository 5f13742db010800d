//! Cursor-derived timestamps.

use chrono::{DateTime, TimeDelta, Utc};

/// Timestamp for the row at `cursor`: `base - cursor * unit_ms` milliseconds.
///
/// Returns `None` when the result is not representable.
pub fn cursor_timestamp(base: DateTime<Utc>, cursor: u64, unit_ms: i64) -> Option<DateTime<Utc>> {
    let offset_ms = i64::try_from(cursor).ok()?.checked_mul(unit_ms)?;
    base.checked_sub_signed(TimeDelta::try_milliseconds(offset_ms)?)
}
