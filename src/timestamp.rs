//! Conversion between the storage epoch and calendar time.
//!
//! Day One stores dates as floating-point seconds since 2001-01-01T00:00:00Z,
//! the reference date of the persistence framework it is built on. Values are
//! converted to local calendar time; the entry's own time zone column is
//! advisory metadata and is never applied here.

use crate::constants::STORAGE_EPOCH_OFFSET_SECS;
use chrono::{DateTime, Local, TimeZone, Utc};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Converts a raw storage timestamp into local calendar time.
///
/// Absent values stay absent rather than collapsing to the epoch. Values that
/// are not finite or fall outside the representable range also map to `None`.
///
/// # Examples
///
/// ```
/// use dayone_tools::timestamp::to_calendar_time;
/// use chrono::Utc;
///
/// let dt = to_calendar_time(Some(0.0)).unwrap();
/// assert_eq!(dt.with_timezone(&Utc).to_rfc3339(), "2001-01-01T00:00:00+00:00");
/// assert!(to_calendar_time(None).is_none());
/// ```
pub fn to_calendar_time(raw: Option<f64>) -> Option<DateTime<Local>> {
    let raw = raw?;
    if !raw.is_finite() {
        return None;
    }

    let whole = raw.floor();
    let mut secs = (whole as i64).checked_add(STORAGE_EPOCH_OFFSET_SECS)?;
    let mut nanos = ((raw - whole) * NANOS_PER_SEC).round() as u32;
    if nanos >= 1_000_000_000 {
        secs = secs.checked_add(1)?;
        nanos -= 1_000_000_000;
    }

    DateTime::<Utc>::from_timestamp(secs, nanos).map(|dt| dt.with_timezone(&Local))
}

/// Converts a calendar time back into a raw storage timestamp.
///
/// This is the inverse of [`to_calendar_time`] for any value whose fractional
/// part is representable at nanosecond precision.
///
/// Calendar times carry nanosecond resolution. For raw values with a magnitude
/// of at least 2^23 seconds (about three months either side of the storage
/// epoch) the spacing between adjacent `f64` values is coarser than a
/// nanosecond and the round trip is exact. Closer to the epoch, digits finer
/// than a nanosecond are rounded away.
///
/// # Examples
///
/// ```
/// use dayone_tools::timestamp::{from_calendar_time, to_calendar_time};
///
/// let dt = to_calendar_time(Some(612_345_678.5)).unwrap();
/// assert_eq!(from_calendar_time(&dt), 612_345_678.5);
/// ```
pub fn from_calendar_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> f64 {
    let storage_secs = dt.timestamp() - STORAGE_EPOCH_OFFSET_SECS;
    storage_secs as f64 + f64::from(dt.timestamp_subsec_nanos()) / NANOS_PER_SEC
}
