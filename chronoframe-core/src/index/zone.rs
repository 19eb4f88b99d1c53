//! Conversions between absolute instants and zone-local wall clock time.

use chrono::offset::{LocalResult, Offset};
use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::Frequency;

/// Wall clock time of `ts` in `tz`, or UTC when no zone is set.
pub(crate) fn to_local(ts: DateTime<Utc>, tz: Option<Tz>) -> NaiveDateTime {
    match tz {
        Some(tz) => ts.with_timezone(&tz).naive_local(),
        None => ts.naive_utc(),
    }
}

/// Resolve a wall clock time in `tz` back to an instant.
///
/// Inside a fall-back overlap the mapping whose offset matches `hint` wins,
/// else the earlier one. Inside a spring-forward gap the first valid instant
/// after the gap is used.
pub(crate) fn from_local(
    naive: NaiveDateTime,
    tz: Option<Tz>,
    hint: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let Some(tz) = tz else {
        return Some(naive.and_utc());
    };
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(early, late) => {
            let wanted = hint.map(|h| h.with_timezone(&tz).offset().fix().local_minus_utc());
            if wanted == Some(late.offset().fix().local_minus_utc()) {
                Some(late.with_timezone(&Utc))
            } else {
                Some(early.with_timezone(&Utc))
            }
        }
        LocalResult::None => {
            let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// Bucket start of `ts` under `freq`.
///
/// Sub-daily frequencies bucket absolute time; day and coarser frequencies
/// bucket the local calendar of `tz`.
pub(crate) fn floor_instant(
    ts: DateTime<Utc>,
    freq: &Frequency,
    tz: Option<Tz>,
) -> Option<DateTime<Utc>> {
    if !freq.is_calendar_day_or_coarser() || tz.is_none() {
        return freq.floor(ts.naive_utc()).map(|n| n.and_utc());
    }
    let local = freq.floor(to_local(ts, tz))?;
    from_local(local, tz, Some(ts))
}

/// The grid point after `ts` under `freq`.
pub(crate) fn advance_instant(
    ts: DateTime<Utc>,
    freq: &Frequency,
    tz: Option<Tz>,
) -> Option<DateTime<Utc>> {
    if !freq.is_calendar_day_or_coarser() || tz.is_none() {
        return freq.advance(ts.naive_utc()).map(|n| n.and_utc());
    }
    let local = freq.advance(to_local(ts, tz))?;
    from_local(local, tz, None)
}
