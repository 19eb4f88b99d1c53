use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use super::frequency::whole_months_between;
use super::{FreqUnit, Frequency};

const DAY: i64 = 86_400;

/// Estimate a representative step from positive adjacent deltas of sorted
/// points.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median so the result is an observed cadence.
///
/// ```
/// use chronoframe_core::estimate_step;
/// // Adjacent deltas: 60,60,60,120,180 => unique mode is 60
/// assert_eq!(estimate_step(&[0, 60, 120, 180, 300, 480]), Some(60));
/// // Adjacent deltas: 60,60,120,120 => lower median is 60
/// assert_eq!(estimate_step(&[0, 60, 120, 240, 360]), Some(60));
/// ```
///
/// Duplicates are ignored. Returns `None` if fewer than two distinct points are
/// present.
#[must_use]
pub fn estimate_step(points: &[i64]) -> Option<i64> {
    let mut deltas: Vec<i64> = points
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0)
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta = deltas[0];
    let mut best_count = 0_usize;
    let mut candidates = 0_usize;
    let mut cur_delta = deltas[0];
    let mut cur_count = 0_usize;
    for &d in &deltas {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        tally(cur_delta, cur_count, &mut best_delta, &mut best_count, &mut candidates);
        cur_delta = d;
        cur_count = 1;
    }
    tally(cur_delta, cur_count, &mut best_delta, &mut best_count, &mut candidates);

    if candidates == 1 {
        return Some(best_delta);
    }
    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

fn tally(delta: i64, count: usize, best: &mut i64, best_count: &mut usize, candidates: &mut usize) {
    if count > *best_count {
        *best = delta;
        *best_count = count;
        *candidates = 1;
    } else if count == *best_count {
        *candidates += 1;
    }
}

/// Infer a frequency for calendar-anchored points (timestamps in local time or
/// period starts).
///
/// Points all on the first of a month at midnight are read as months,
/// quarters or years. Weekday-only daily data with weekend jumps is read as
/// business days. Everything else maps the estimated step in seconds.
pub(crate) fn infer_calendar(points: &[NaiveDateTime]) -> Option<Frequency> {
    if points.len() < 2 {
        return None;
    }
    if points
        .iter()
        .all(|p| p.day() == 1 && p.num_seconds_from_midnight() == 0)
    {
        let months: Option<Vec<i64>> = points
            .windows(2)
            .map(|w| whole_months_between(w[0], w[1]))
            .collect();
        if let Some(months) = months {
            let mut cumulative = Vec::with_capacity(months.len() + 1);
            cumulative.push(0_i64);
            for m in months {
                cumulative.push(cumulative.last().copied().unwrap_or(0) + m);
            }
            if let Some(step) = estimate_step(&cumulative) {
                return calendar_months(step);
            }
        }
    }
    let secs: Vec<i64> = points.iter().map(|p| p.and_utc().timestamp()).collect();
    let step = estimate_step(&secs)?;
    if step == DAY && looks_like_business_days(points) {
        return Some(Frequency::business_day());
    }
    Frequency::from_step_seconds(step)
}

/// Infer a fixed frequency from offsets in seconds.
pub(crate) fn infer_fixed(offsets: &[i64]) -> Option<Frequency> {
    estimate_step(offsets).and_then(Frequency::from_step_seconds)
}

fn calendar_months(step: i64) -> Option<Frequency> {
    let step = u32::try_from(step).ok()?;
    let (unit, n) = if step % 12 == 0 {
        (FreqUnit::Year, step / 12)
    } else if step % 3 == 0 {
        (FreqUnit::Quarter, step / 3)
    } else {
        (FreqUnit::Month, step)
    };
    Frequency::new(unit, n).ok()
}

fn looks_like_business_days(points: &[NaiveDateTime]) -> bool {
    let weekdays_only = points
        .iter()
        .all(|p| !matches!(p.weekday(), Weekday::Sat | Weekday::Sun));
    let weekend_jump = points
        .windows(2)
        .any(|w| w[0].weekday() == Weekday::Fri && (w[1] - w[0]).num_days() == 3);
    weekdays_only && weekend_jump
}
