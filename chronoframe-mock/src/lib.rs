//! Deterministic fixture tables and holiday calendars for chronoframe tests
//! and examples.
//!
//! [`MockTableSource`] serves a handful of static tables by key. The key
//! `FAIL` always fails with a source error. [`FixedHolidays`] implements
//! [`HolidayCalendar`] over a fixed list of dates.

use chrono::NaiveDate;
use chronoframe_core::{ChronoError, HolidayCalendar, Table, TableSource};

mod fixtures;

/// Table source for CI-safe examples. Serves deterministic data from static
/// fixtures.
pub struct MockTableSource;

impl Default for MockTableSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTableSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TableSource for MockTableSource {
    fn name(&self) -> &'static str {
        "chronoframe-mock"
    }

    fn keys(&self) -> Vec<String> {
        fixtures::tables::KEYS.iter().map(|k| (*k).to_string()).collect()
    }

    fn load(&self, key: &str) -> Result<Table, ChronoError> {
        if key == "FAIL" {
            return Err(ChronoError::source(self.name(), "forced failure: load"));
        }
        fixtures::tables::by_key(key).ok_or_else(|| ChronoError::key_not_found(key))
    }
}

/// Holiday calendar over a fixed set of dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHolidays {
    name: String,
    dates: Vec<NaiveDate>,
}

impl FixedHolidays {
    /// Calendar called `name` closed on `dates`.
    pub fn new(name: impl Into<String>, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self {
            name: name.into(),
            dates,
        }
    }

    /// US equity market holidays for 2024.
    #[must_use]
    pub fn nyse_2024() -> Self {
        Self::new("NYSE", fixtures::calendars::nyse_2024())
    }

    /// Every date the calendar is closed on, ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl HolidayCalendar for FixedHolidays {
    fn name(&self) -> &str {
        &self.name
    }

    fn holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, ChronoError> {
        if start > end {
            return Err(ChronoError::source(
                self.name.clone(),
                format!("holiday range starts after it ends: {start} > {end}"),
            ));
        }
        Ok(self
            .dates
            .iter()
            .copied()
            .filter(|d| (start..=end).contains(d))
            .collect())
    }
}
