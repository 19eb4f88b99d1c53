//! Coercion of loosely typed labels into a temporal index.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use super::{FreqUnit, Frequency, TimeIndex};
use crate::ChronoError;

/// Raw index labels as supplied by a caller or a table source.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexLabels {
    /// Absolute instants.
    Timestamps(Vec<DateTime<Utc>>),
    /// Calendar dates, read as midnight UTC.
    Dates(Vec<NaiveDate>),
    /// Offsets from an origin.
    Durations(Vec<TimeDelta>),
    /// Text labels: RFC 3339, `YYYY-MM-DD[ HH:MM:SS]`, `YYYY-MM`, `YYYYQn` or `YYYY`.
    Text(Vec<String>),
    /// Positional integers; never a temporal index.
    Integers(Vec<i64>),
}

impl IndexLabels {
    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Timestamps(v) => v.len(),
            Self::Dates(v) => v.len(),
            Self::Durations(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Integers(v) => v.len(),
        }
    }

    /// Whether there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<DateTime<Utc>>> for IndexLabels {
    fn from(v: Vec<DateTime<Utc>>) -> Self {
        Self::Timestamps(v)
    }
}

impl From<Vec<NaiveDate>> for IndexLabels {
    fn from(v: Vec<NaiveDate>) -> Self {
        Self::Dates(v)
    }
}

impl From<Vec<&str>> for IndexLabels {
    fn from(v: Vec<&str>) -> Self {
        Self::Text(v.into_iter().map(str::to_string).collect())
    }
}

enum Parsed {
    Instant(DateTime<Utc>),
    Period(NaiveDateTime, FreqUnit),
}

fn parse_label(s: &str) -> Option<Parsed> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Parsed::Instant(dt.with_timezone(&Utc)));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Parsed::Instant(n.and_utc()));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Parsed::Instant(d.and_hms_opt(0, 0, 0)?.and_utc()));
    }
    let all_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    if let Some((year, quarter)) = s.split_once(['Q', 'q']) {
        if all_digits(year) && all_digits(quarter) {
            let q: u32 = quarter.parse().ok()?;
            if !(1..=4).contains(&q) {
                return None;
            }
            let start = NaiveDate::from_ymd_opt(year.parse().ok()?, (q - 1) * 3 + 1, 1)?;
            return Some(Parsed::Period(start.and_hms_opt(0, 0, 0)?, FreqUnit::Quarter));
        }
        return None;
    }
    if s.len() == 7 {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return Some(Parsed::Period(d.and_hms_opt(0, 0, 0)?, FreqUnit::Month));
        }
    }
    if s.len() == 4 && all_digits(s) {
        let start = NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)?;
        return Some(Parsed::Period(start.and_hms_opt(0, 0, 0)?, FreqUnit::Year));
    }
    None
}

pub(super) fn coerce(
    labels: IndexLabels,
    freq: Option<Frequency>,
) -> Result<TimeIndex, ChronoError> {
    let index = match labels {
        IndexLabels::Timestamps(ts) => TimeIndex::timestamps(ts)?,
        IndexLabels::Dates(dates) => TimeIndex::timestamps(
            dates
                .into_iter()
                .map(|d| d.and_hms_opt(0, 0, 0).map(|n| n.and_utc()))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ChronoError::IncoercibleIndex("date out of range".into()))?,
        )?,
        IndexLabels::Durations(d) => TimeIndex::durations(d)?,
        IndexLabels::Integers(_) => {
            return Err(ChronoError::IncoercibleIndex(
                "integer positions are not a temporal index".into(),
            ));
        }
        IndexLabels::Text(text) => return coerce_text(&text, freq),
    };
    match freq {
        Some(f) => index.with_freq(f),
        None => Ok(index),
    }
}

fn coerce_text(text: &[String], freq: Option<Frequency>) -> Result<TimeIndex, ChronoError> {
    let parsed = text
        .iter()
        .map(|s| {
            parse_label(s)
                .ok_or_else(|| ChronoError::IncoercibleIndex(format!("unrecognised label {s:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parsed.iter().all(|p| matches!(p, Parsed::Instant(_))) {
        let ts = parsed
            .into_iter()
            .filter_map(|p| match p {
                Parsed::Instant(t) => Some(t),
                Parsed::Period(..) => None,
            })
            .collect();
        let index = TimeIndex::timestamps(ts)?;
        return match freq {
            Some(f) => index.with_freq(f),
            None => Ok(index),
        };
    }

    let mut unit = None;
    let mut starts = Vec::with_capacity(parsed.len());
    for p in parsed {
        match p {
            Parsed::Period(start, u) if unit.is_none_or(|seen| seen == u) => {
                unit = Some(u);
                starts.push(start);
            }
            _ => {
                return Err(ChronoError::IncoercibleIndex(
                    "labels mix timestamp and period formats".into(),
                ));
            }
        }
    }
    let freq = match (freq, unit) {
        (Some(f), _) => f,
        (None, Some(u)) => Frequency::new(u, 1)?,
        (None, None) => {
            return Err(ChronoError::IncoercibleIndex("no labels to coerce".into()));
        }
    };
    if let Some(bad) = starts.iter().find(|s| !freq.is_on_grid(**s)) {
        return Err(ChronoError::IncoercibleIndex(format!(
            "{bad} is not a period start of frequency {freq}"
        )));
    }
    TimeIndex::periods(starts, freq)
}
