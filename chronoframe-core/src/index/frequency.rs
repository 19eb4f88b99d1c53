//! Regular steps of a temporal index and the grid arithmetic behind resampling.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::ChronoError;
use crate::source::HolidayCalendar;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;
// Mean Gregorian month and year, used only to rank frequencies.
const MONTH: i64 = 2_629_746;
const YEAR: i64 = 31_556_952;

// A business-day search never has to look further than this many days.
const MAX_SESSION_SCAN: usize = 370;

/// Base unit of a frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreqUnit {
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Calendar days.
    Day,
    /// Weekdays, optionally minus the holidays of a trading calendar.
    Business,
    /// Weeks starting Monday.
    Week,
    /// Calendar months.
    Month,
    /// Calendar quarters.
    Quarter,
    /// Calendar years.
    Year,
}

impl FreqUnit {
    const fn alias(self) -> &'static str {
        match self {
            Self::Second => "S",
            Self::Minute => "min",
            Self::Hour => "H",
            Self::Day => "D",
            Self::Business => "B",
            Self::Week => "W",
            Self::Month => "M",
            Self::Quarter => "Q",
            Self::Year => "Y",
        }
    }

    const fn nominal_seconds(self) -> i64 {
        match self {
            Self::Second => 1,
            Self::Minute => MINUTE,
            Self::Hour => HOUR,
            Self::Day | Self::Business => DAY,
            Self::Week => WEEK,
            Self::Month => MONTH,
            Self::Quarter => 3 * MONTH,
            Self::Year => YEAR,
        }
    }
}

/// Holiday set of a trading-style calendar, captured from a [`HolidayCalendar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingCalendar {
    name: String,
    holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// Build a calendar from an explicit holiday set.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Calendar name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Excluded dates.
    #[must_use]
    pub const fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Whether `date` is a trading session (a weekday that is not a holiday).
    #[must_use]
    pub fn is_session(&self, date: NaiveDate) -> bool {
        is_weekday(date) && !self.holidays.contains(&date)
    }
}

/// A regular step: a unit, a multiplier, and for business days an optional
/// trading calendar.
///
/// Parsed from pandas-style aliases with an optional multiplier, e.g. `"D"`,
/// `"5min"`, `"2H"`, `"MS"`, `"Q"`, `"A"`.
///
/// ```
/// use chronoframe_core::{Frequency, FreqUnit};
/// let f: Frequency = "15min".parse().unwrap();
/// assert_eq!(f.unit(), FreqUnit::Minute);
/// assert_eq!(f.step(), 15);
/// assert_eq!(f.to_string(), "15min");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    unit: FreqUnit,
    step: u32,
    calendar: Option<Arc<TradingCalendar>>,
}

impl Frequency {
    /// Build a frequency of `step` units.
    ///
    /// # Errors
    /// Returns `IncompatibleFrequency` for a zero step, a multi-day business
    /// step, or a step whose length in months or seconds does not fit.
    pub fn new(unit: FreqUnit, step: u32) -> Result<Self, ChronoError> {
        if step == 0 {
            return Err(ChronoError::IncompatibleFrequency(
                "frequency step must be positive".into(),
            ));
        }
        if unit == FreqUnit::Business && step != 1 {
            return Err(ChronoError::IncompatibleFrequency(
                "business-day frequencies only support a step of one".into(),
            ));
        }
        let months = step.checked_mul(unit_months(unit));
        let seconds = unit
            .nominal_seconds()
            .checked_mul(i64::from(step))
            .and_then(TimeDelta::try_seconds);
        if months.is_none() || seconds.is_none() {
            return Err(ChronoError::IncompatibleFrequency(format!(
                "a step of {step} is too large for this unit"
            )));
        }
        Ok(Self {
            unit,
            step,
            calendar: None,
        })
    }

    const fn unit_step(unit: FreqUnit) -> Self {
        Self {
            unit,
            step: 1,
            calendar: None,
        }
    }

    /// One second.
    #[must_use]
    pub const fn second() -> Self {
        Self::unit_step(FreqUnit::Second)
    }
    /// One minute.
    #[must_use]
    pub const fn minute() -> Self {
        Self::unit_step(FreqUnit::Minute)
    }
    /// One hour.
    #[must_use]
    pub const fn hour() -> Self {
        Self::unit_step(FreqUnit::Hour)
    }
    /// One calendar day.
    #[must_use]
    pub const fn day() -> Self {
        Self::unit_step(FreqUnit::Day)
    }
    /// One weekday.
    #[must_use]
    pub const fn business_day() -> Self {
        Self::unit_step(FreqUnit::Business)
    }
    /// One Monday-anchored week.
    #[must_use]
    pub const fn week() -> Self {
        Self::unit_step(FreqUnit::Week)
    }
    /// One calendar month.
    #[must_use]
    pub const fn month() -> Self {
        Self::unit_step(FreqUnit::Month)
    }
    /// One calendar quarter.
    #[must_use]
    pub const fn quarter() -> Self {
        Self::unit_step(FreqUnit::Quarter)
    }
    /// One calendar year.
    #[must_use]
    pub const fn year() -> Self {
        Self::unit_step(FreqUnit::Year)
    }

    /// Trading-day frequency: weekdays minus the holidays `calendar` reports
    /// between `start` and `end` (inclusive).
    ///
    /// # Errors
    /// Propagates the calendar's failure.
    pub fn trading(
        calendar: &dyn HolidayCalendar,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ChronoError> {
        let holidays = calendar.holidays(start, end)?;
        Ok(Self::with_calendar(TradingCalendar::new(
            calendar.name(),
            holidays,
        )))
    }

    /// Trading-day frequency over an already captured calendar.
    #[must_use]
    pub fn with_calendar(calendar: TradingCalendar) -> Self {
        Self {
            unit: FreqUnit::Business,
            step: 1,
            calendar: Some(Arc::new(calendar)),
        }
    }

    /// Base unit.
    #[must_use]
    pub const fn unit(&self) -> FreqUnit {
        self.unit
    }

    /// Multiplier of the base unit.
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// Trading calendar, when this is a custom business-day frequency.
    #[must_use]
    pub fn calendar(&self) -> Option<&TradingCalendar> {
        self.calendar.as_deref()
    }

    /// Nominal length in seconds, used to rank frequencies against each other.
    #[must_use]
    pub const fn nominal_seconds(&self) -> i64 {
        self.unit.nominal_seconds().saturating_mul(self.step as i64)
    }

    /// Whether every step has the same length (seconds through weeks).
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(
            self.unit,
            FreqUnit::Second | FreqUnit::Minute | FreqUnit::Hour | FreqUnit::Day | FreqUnit::Week
        )
    }

    /// Whether the frequency is at least a day long, so that bucket boundaries
    /// follow local midnight of a time zone.
    #[must_use]
    pub const fn is_calendar_day_or_coarser(&self) -> bool {
        !matches!(
            self.unit,
            FreqUnit::Second | FreqUnit::Minute | FreqUnit::Hour
        )
    }

    fn fixed_seconds(&self) -> Option<i64> {
        self.is_fixed().then(|| self.nominal_seconds())
    }

    fn is_session(&self, date: NaiveDate) -> bool {
        match &self.calendar {
            Some(cal) => cal.is_session(date),
            None => is_weekday(date),
        }
    }

    /// Start of the calendar bucket containing `t`.
    ///
    /// Seconds through days are anchored at the Unix epoch, weeks at Monday,
    /// months, quarters and years at January 1970, business days roll back to
    /// the most recent session.
    #[must_use]
    pub fn floor(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            FreqUnit::Second | FreqUnit::Minute | FreqUnit::Hour | FreqUnit::Day => {
                let step = self.nominal_seconds();
                let secs = t.and_utc().timestamp();
                naive_from_secs(secs - secs.rem_euclid(step))
            }
            FreqUnit::Week => {
                let day = t.and_utc().timestamp().div_euclid(DAY);
                // 1970-01-01 is a Thursday, so Monday-start weeks are offset by 3 days.
                let week = (day + 3).div_euclid(7);
                let week = week - week.rem_euclid(i64::from(self.step));
                naive_from_secs((week * 7 - 3) * DAY)
            }
            FreqUnit::Month | FreqUnit::Quarter | FreqUnit::Year => {
                let months = i64::from(self.months_per_step());
                let idx = month_index(t.date());
                month_start(idx - idx.rem_euclid(months))
            }
            FreqUnit::Business => {
                let mut date = t.date();
                for _ in 0..MAX_SESSION_SCAN {
                    if self.is_session(date) {
                        return date.and_hms_opt(0, 0, 0);
                    }
                    date = date.pred_opt()?;
                }
                None
            }
        }
    }

    /// The grid point following `t`; `t` is expected to be on the grid.
    #[must_use]
    pub fn advance(&self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            FreqUnit::Second
            | FreqUnit::Minute
            | FreqUnit::Hour
            | FreqUnit::Day
            | FreqUnit::Week => t.checked_add_signed(TimeDelta::seconds(self.nominal_seconds())),
            FreqUnit::Month | FreqUnit::Quarter | FreqUnit::Year => {
                t.checked_add_months(Months::new(self.months_per_step()))
            }
            FreqUnit::Business => {
                let mut date = t.date();
                for _ in 0..MAX_SESSION_SCAN {
                    date = date.succ_opt()?;
                    if self.is_session(date) {
                        return date.and_hms_opt(0, 0, 0);
                    }
                }
                None
            }
        }
    }

    /// Whether `t` is a bucket start of this frequency.
    #[must_use]
    pub fn is_on_grid(&self, t: NaiveDateTime) -> bool {
        self.floor(t) == Some(t)
    }

    /// Bucket start for an offset from an origin; only fixed-length
    /// frequencies have an origin-anchored grid.
    #[must_use]
    pub fn floor_offset(&self, offset: TimeDelta) -> Option<TimeDelta> {
        let step = self.fixed_seconds()?.checked_mul(1000)?;
        let ms = offset.num_milliseconds();
        TimeDelta::try_milliseconds(ms - ms.rem_euclid(step))
    }

    /// Step length for origin-anchored grids.
    #[must_use]
    pub fn fixed_step(&self) -> Option<TimeDelta> {
        self.fixed_seconds().map(TimeDelta::seconds)
    }

    const fn months_per_step(&self) -> u32 {
        unit_months(self.unit).saturating_mul(self.step)
    }

    /// Map a positive step in seconds to the coarsest fixed frequency that
    /// divides it exactly.
    #[must_use]
    pub fn from_step_seconds(secs: i64) -> Option<Self> {
        if secs <= 0 {
            return None;
        }
        let (unit, base) = if secs % WEEK == 0 {
            (FreqUnit::Week, WEEK)
        } else if secs % DAY == 0 {
            (FreqUnit::Day, DAY)
        } else if secs % HOUR == 0 {
            (FreqUnit::Hour, HOUR)
        } else if secs % MINUTE == 0 {
            (FreqUnit::Minute, MINUTE)
        } else {
            (FreqUnit::Second, 1)
        };
        let step = u32::try_from(secs / base).ok()?;
        Self::new(unit, step).ok()
    }

    /// Format a bucket start the way periods of this frequency are labelled.
    #[must_use]
    pub fn period_label(&self, start: NaiveDateTime) -> String {
        match self.unit {
            FreqUnit::Year => start.format("%Y").to_string(),
            FreqUnit::Quarter => format!("{}Q{}", start.year(), start.month0() / 3 + 1),
            FreqUnit::Month => start.format("%Y-%m").to_string(),
            FreqUnit::Week | FreqUnit::Day | FreqUnit::Business => {
                start.format("%Y-%m-%d").to_string()
            }
            FreqUnit::Hour | FreqUnit::Minute => start.format("%Y-%m-%d %H:%M").to_string(),
            FreqUnit::Second => start.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cal) = &self.calendar {
            return write!(f, "C({})", cal.name());
        }
        if self.step != 1 {
            write!(f, "{}", self.step)?;
        }
        f.write_str(self.unit.alias())
    }
}

impl FromStr for Frequency {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, alias) = s.split_at(split);
        let step = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| {
                ChronoError::IncompatibleFrequency(format!("invalid multiplier in {s:?}"))
            })?
        };
        let unit = match alias {
            "S" | "s" | "sec" => FreqUnit::Second,
            "T" | "min" => FreqUnit::Minute,
            "H" | "h" => FreqUnit::Hour,
            "D" | "d" => FreqUnit::Day,
            "B" => FreqUnit::Business,
            "W" | "w" | "W-MON" => FreqUnit::Week,
            "M" | "MS" | "ME" => FreqUnit::Month,
            "Q" | "QS" | "QE" => FreqUnit::Quarter,
            "Y" | "YS" | "YE" | "A" | "AS" => FreqUnit::Year,
            _ => {
                return Err(ChronoError::IncompatibleFrequency(format!(
                    "unknown frequency alias {s:?}"
                )));
            }
        };
        Self::new(unit, step)
    }
}

const fn unit_months(unit: FreqUnit) -> u32 {
    match unit {
        FreqUnit::Quarter => 3,
        FreqUnit::Year => 12,
        _ => 1,
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn naive_from_secs(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

fn month_index(date: NaiveDate) -> i64 {
    (i64::from(date.year()) - 1970) * 12 + i64::from(date.month0())
}

fn month_start(idx: i64) -> Option<NaiveDateTime> {
    let year = i32::try_from(1970 + idx.div_euclid(12)).ok()?;
    let month = u32::try_from(idx.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

/// Count whole calendar months from `a` to `b` when both fall on the same
/// day-of-month and time of day.
pub(crate) fn whole_months_between(a: NaiveDateTime, b: NaiveDateTime) -> Option<i64> {
    if a.day() != b.day() || a.time() != b.time() {
        return None;
    }
    Some(month_index(b.date()) - month_index(a.date()))
}
