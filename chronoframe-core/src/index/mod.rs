//! Temporal indexes: timestamps, durations and periods.

mod frequency;
mod infer;
mod labels;
pub(crate) mod zone;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;

pub use frequency::{FreqUnit, Frequency, TradingCalendar};
pub use infer::estimate_step;
pub use labels::IndexLabels;

use crate::ChronoError;

/// Kind of a temporal index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Absolute instants.
    Timestamp,
    /// Offsets from an origin.
    Duration,
    /// Discrete periods of a frequency.
    Period,
}

/// The points of a temporal index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPoints {
    /// Absolute instants in UTC.
    Timestamps(Vec<DateTime<Utc>>),
    /// Offsets from an origin.
    Durations(Vec<TimeDelta>),
    /// Period start times, in the period's own calendar.
    Periods(Vec<NaiveDateTime>),
}

/// An ordered, strictly increasing, duplicate-free sequence of time points.
///
/// Period indexes always carry their frequency; timestamp and duration
/// indexes may declare one, otherwise it is inferred when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeIndex {
    points: IndexPoints,
    freq: Option<Frequency>,
    tz: Option<Tz>,
    name: Option<String>,
}

fn check_increasing<T: PartialOrd>(points: &[T]) -> Result<(), ChronoError> {
    for (i, w) in points.windows(2).enumerate() {
        if w[1] == w[0] {
            return Err(ChronoError::IndexIntegrity(format!(
                "duplicate index point at position {}",
                i + 1
            )));
        }
        if w[1] < w[0] {
            return Err(ChronoError::IndexIntegrity(format!(
                "index is not strictly increasing at position {}",
                i + 1
            )));
        }
    }
    Ok(())
}

impl TimeIndex {
    fn from_points(points: IndexPoints, freq: Option<Frequency>) -> Self {
        Self {
            points,
            freq,
            tz: None,
            name: None,
        }
    }

    /// Index of `kind` without points.
    #[must_use]
    pub const fn empty(kind: IndexKind) -> Self {
        let points = match kind {
            IndexKind::Timestamp => IndexPoints::Timestamps(Vec::new()),
            IndexKind::Duration => IndexPoints::Durations(Vec::new()),
            IndexKind::Period => IndexPoints::Periods(Vec::new()),
        };
        Self {
            points,
            freq: None,
            tz: None,
            name: None,
        }
    }

    /// Timestamp index.
    ///
    /// # Errors
    /// Returns `IndexIntegrity` for duplicate or decreasing points.
    pub fn timestamps(points: Vec<DateTime<Utc>>) -> Result<Self, ChronoError> {
        check_increasing(&points)?;
        Ok(Self::from_points(IndexPoints::Timestamps(points), None))
    }

    /// Duration index.
    ///
    /// # Errors
    /// Returns `IndexIntegrity` for duplicate or decreasing points.
    pub fn durations(points: Vec<TimeDelta>) -> Result<Self, ChronoError> {
        check_increasing(&points)?;
        Ok(Self::from_points(IndexPoints::Durations(points), None))
    }

    /// Period index: each point is mapped to the start of its period.
    ///
    /// # Errors
    /// Returns `IndexIntegrity` when two points fall in the same period or the
    /// periods decrease, `IncoercibleIndex` when a period start is out of range.
    pub fn periods(
        points: impl IntoIterator<Item = NaiveDateTime>,
        freq: Frequency,
    ) -> Result<Self, ChronoError> {
        let starts = points
            .into_iter()
            .map(|p| {
                freq.floor(p).ok_or_else(|| {
                    ChronoError::IncoercibleIndex(format!("no {freq} period contains {p}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        check_increasing(&starts)?;
        Ok(Self::from_points(IndexPoints::Periods(starts), Some(freq)))
    }

    /// `n` consecutive periods starting with the one containing `start`.
    ///
    /// # Errors
    /// Returns `IncoercibleIndex` when the range leaves the supported calendar.
    pub fn period_range(start: NaiveDate, n: usize, freq: Frequency) -> Result<Self, ChronoError> {
        let first = start
            .and_hms_opt(0, 0, 0)
            .and_then(|s| freq.floor(s))
            .ok_or_else(|| ChronoError::IncoercibleIndex(format!("invalid start {start}")))?;
        let starts = walk(first, n, |p| freq.advance(p))?;
        Ok(Self::from_points(IndexPoints::Periods(starts), Some(freq)))
    }

    /// `n` consecutive timestamps of `freq`, starting at the grid point
    /// containing `start`.
    ///
    /// # Errors
    /// Returns `IncoercibleIndex` when the range leaves the supported calendar.
    pub fn date_range(
        start: DateTime<Utc>,
        n: usize,
        freq: Frequency,
    ) -> Result<Self, ChronoError> {
        let first = zone::floor_instant(start, &freq, None)
            .ok_or_else(|| ChronoError::IncoercibleIndex(format!("invalid start {start}")))?;
        let points = walk(first, n, |p| zone::advance_instant(p, &freq, None))?;
        Ok(Self::from_points(IndexPoints::Timestamps(points), Some(freq)))
    }

    /// `n` offsets `0, step, 2*step, ...`.
    ///
    /// # Errors
    /// Returns `IncoercibleIndex` for a non-positive step or one that is not
    /// a whole number of seconds.
    pub fn duration_range(step: TimeDelta, n: usize) -> Result<Self, ChronoError> {
        if step <= TimeDelta::zero() {
            return Err(ChronoError::IncoercibleIndex(
                "duration step must be positive".into(),
            ));
        }
        if step.subsec_nanos() != 0 {
            return Err(ChronoError::IncoercibleIndex(format!(
                "duration step {step} is not a whole number of seconds"
            )));
        }
        let points = walk(TimeDelta::zero(), n, |p| p.checked_add(&step))?;
        let freq = Frequency::from_step_seconds(step.num_seconds());
        Ok(Self::from_points(IndexPoints::Durations(points), freq))
    }

    /// Coerce loose labels to a temporal index.
    ///
    /// # Errors
    /// Returns `IncoercibleIndex` when the labels are not temporal and
    /// `IndexIntegrity` when the coerced points are not strictly increasing.
    pub fn coerce(labels: IndexLabels, freq: Option<Frequency>) -> Result<Self, ChronoError> {
        labels::coerce(labels, freq)
    }

    /// Declare a frequency.
    ///
    /// # Errors
    /// For period indexes every point must be a period start of the new
    /// frequency, otherwise `IncompatibleFrequency`.
    pub fn with_freq(mut self, freq: Frequency) -> Result<Self, ChronoError> {
        if let IndexPoints::Periods(starts) = &self.points {
            if let Some(bad) = starts.iter().find(|s| !freq.is_on_grid(**s)) {
                return Err(ChronoError::IncompatibleFrequency(format!(
                    "{bad} is not a period start of {freq}"
                )));
            }
        }
        self.freq = Some(freq);
        Ok(self)
    }

    /// Attach a time zone; only meaningful for timestamp indexes.
    ///
    /// # Errors
    /// Returns `TypeMismatch` for duration and period indexes.
    pub fn with_tz(mut self, tz: Tz) -> Result<Self, ChronoError> {
        if self.kind() != IndexKind::Timestamp {
            return Err(ChronoError::TypeMismatch(format!(
                "time zones apply to timestamp indexes, not {:?}",
                self.kind()
            )));
        }
        self.tz = Some(tz);
        Ok(self)
    }

    /// Attach a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Index kind.
    #[must_use]
    pub const fn kind(&self) -> IndexKind {
        match self.points {
            IndexPoints::Timestamps(_) => IndexKind::Timestamp,
            IndexPoints::Durations(_) => IndexKind::Duration,
            IndexPoints::Periods(_) => IndexKind::Period,
        }
    }

    /// Raw points.
    #[must_use]
    pub const fn points(&self) -> &IndexPoints {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.points {
            IndexPoints::Timestamps(v) => v.len(),
            IndexPoints::Durations(v) => v.len(),
            IndexPoints::Periods(v) => v.len(),
        }
    }

    /// Whether the index has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared frequency.
    #[must_use]
    pub const fn freq(&self) -> Option<&Frequency> {
        self.freq.as_ref()
    }

    /// Declared frequency, or one inferred from the spacing of the points.
    #[must_use]
    pub fn effective_freq(&self) -> Option<Frequency> {
        if let Some(f) = &self.freq {
            return Some(f.clone());
        }
        match &self.points {
            IndexPoints::Timestamps(v) => {
                let local: Vec<NaiveDateTime> =
                    v.iter().map(|t| zone::to_local(*t, self.tz)).collect();
                infer::infer_calendar(&local)
            }
            IndexPoints::Periods(v) => infer::infer_calendar(v),
            IndexPoints::Durations(v) => {
                // grids are whole seconds
                if v.iter().any(|d| d.subsec_nanos() != 0) {
                    return None;
                }
                let secs: Vec<i64> = v.iter().map(TimeDelta::num_seconds).collect();
                infer::infer_fixed(&secs)
            }
        }
    }

    /// Time zone of a timestamp index.
    #[must_use]
    pub const fn tz(&self) -> Option<Tz> {
        self.tz
    }

    /// Index name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Text label of the point at `pos`.
    ///
    /// Timestamps render as `YYYY-MM-DD` at local midnight and
    /// `YYYY-MM-DDTHH:MM:SS` otherwise, periods by their frequency
    /// (`2020-01`, `2020Q1`, `2020`), durations in ISO 8601.
    #[must_use]
    pub fn label(&self, pos: usize) -> Option<String> {
        match &self.points {
            IndexPoints::Timestamps(v) => v.get(pos).map(|t| {
                let local = zone::to_local(*t, self.tz);
                if local.time() == chrono::NaiveTime::MIN {
                    local.format("%Y-%m-%d").to_string()
                } else {
                    local.format("%Y-%m-%dT%H:%M:%S").to_string()
                }
            }),
            IndexPoints::Durations(v) => v.get(pos).map(ToString::to_string),
            IndexPoints::Periods(v) => {
                let freq = self.freq.as_ref()?;
                v.get(pos).map(|p| freq.period_label(*p))
            }
        }
    }

    /// Labels of every point.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).filter_map(|i| self.label(i)).collect()
    }

    /// Sub-index of the given positions; positions must be increasing.
    #[must_use]
    pub(crate) fn take(&self, positions: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[T], positions: &[usize]) -> Vec<T> {
            positions.iter().filter_map(|&i| v.get(i).cloned()).collect()
        }
        let points = match &self.points {
            IndexPoints::Timestamps(v) => IndexPoints::Timestamps(pick(v, positions)),
            IndexPoints::Durations(v) => IndexPoints::Durations(pick(v, positions)),
            IndexPoints::Periods(v) => IndexPoints::Periods(pick(v, positions)),
        };
        Self {
            points,
            freq: self.freq.clone(),
            tz: self.tz,
            name: self.name.clone(),
        }
    }

    /// Same kind, zone and name with new points and frequency.
    pub(crate) fn rebuilt(&self, points: IndexPoints, freq: Option<Frequency>) -> Self {
        Self {
            points,
            freq,
            tz: self.tz,
            name: self.name.clone(),
        }
    }

    /// Whether points of `other` can be matched against points of this index.
    ///
    /// Timestamps and periods align by period start; durations only align
    /// with durations.
    #[must_use]
    pub fn is_alignable_with(&self, other: &Self) -> bool {
        (self.kind() == IndexKind::Duration) == (other.kind() == IndexKind::Duration)
    }

    fn calendar_keys(&self) -> Vec<NaiveDateTime> {
        match &self.points {
            IndexPoints::Timestamps(v) => v.iter().map(|t| zone::to_local(*t, self.tz)).collect(),
            IndexPoints::Periods(v) => v.clone(),
            IndexPoints::Durations(v) => v
                .iter()
                .filter_map(|d| DateTime::<Utc>::UNIX_EPOCH.naive_utc().checked_add_signed(*d))
                .collect(),
        }
    }

    /// For every point of `target`, the position of the matching point in
    /// this index, if any.
    ///
    /// # Errors
    /// Returns `IncompatibleFrequency` when the kinds cannot be aligned.
    pub fn align_to(&self, target: &Self) -> Result<Vec<Option<usize>>, ChronoError> {
        if !self.is_alignable_with(target) {
            return Err(ChronoError::IncompatibleFrequency(format!(
                "cannot align a {:?} index onto a {:?} index",
                self.kind(),
                target.kind()
            )));
        }
        let positions: BTreeMap<i64, usize> = match (&self.points, &target.points) {
            (IndexPoints::Timestamps(a), IndexPoints::Timestamps(_)) => a
                .iter()
                .enumerate()
                .map(|(i, t)| (t.timestamp(), i))
                .collect(),
            _ => self
                .calendar_keys()
                .iter()
                .enumerate()
                .map(|(i, k)| (k.and_utc().timestamp(), i))
                .collect(),
        };
        let keys: Vec<i64> = match (&self.points, &target.points) {
            (IndexPoints::Timestamps(_), IndexPoints::Timestamps(b)) => {
                b.iter().map(DateTime::timestamp).collect()
            }
            _ => target
                .calendar_keys()
                .iter()
                .map(|k| k.and_utc().timestamp())
                .collect(),
        };
        Ok(keys.iter().map(|k| positions.get(k).copied()).collect())
    }
}

fn walk<T: Copy>(
    first: T,
    n: usize,
    mut next: impl FnMut(T) -> Option<T>,
) -> Result<Vec<T>, ChronoError> {
    let mut out = Vec::with_capacity(n);
    let mut cur = first;
    for i in 0..n {
        if i > 0 {
            cur = next(cur).ok_or_else(|| {
                ChronoError::IncoercibleIndex("range overflows the calendar".into())
            })?;
        }
        out.push(cur);
    }
    Ok(out)
}
