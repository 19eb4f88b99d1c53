//! Contracts for the collaborators that feed the data layer.
//!
//! Loading files, querying databases and looking up exchange calendars happen
//! outside this crate; implementations hand over already materialised tables
//! and holiday sets through these traits.

use chrono::NaiveDate;

use crate::{ChronoError, Frequency, IndexLabels, Values};

/// A rectangular table: labelled columns sharing one index.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Shared row labels.
    pub index: IndexLabels,
    /// Declared row frequency, if known.
    pub freq: Option<Frequency>,
    /// Columns in order.
    pub columns: Vec<(String, Values)>,
}

impl Table {
    /// Empty table over `index`.
    pub fn new(index: impl Into<IndexLabels>) -> Self {
        Self {
            index: index.into(),
            freq: None,
            columns: Vec::new(),
        }
    }

    /// Append a column.
    #[must_use]
    pub fn with_column(mut self, label: impl Into<String>, values: impl Into<Values>) -> Self {
        self.columns.push((label.into(), values.into()));
        self
    }

    /// Declare the row frequency.
    #[must_use]
    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    /// Column by label (first match).
    #[must_use]
    pub fn column(&self, label: &str) -> Option<&Values> {
        self.columns
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// Supplies tables by key.
pub trait TableSource: Send + Sync {
    /// Stable source name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Keys of the tables this source can load.
    fn keys(&self) -> Vec<String>;

    /// Load one table.
    ///
    /// # Errors
    /// Implementations report failures as `ChronoError::Source`, or
    /// `KeyNotFound` for an unknown key.
    fn load(&self, key: &str) -> Result<Table, ChronoError>;
}

/// Supplies the dates excluded from a trading-style calendar.
pub trait HolidayCalendar: Send + Sync {
    /// Calendar name, e.g. an exchange code.
    fn name(&self) -> &str;

    /// Holidays between `start` and `end`, inclusive.
    ///
    /// # Errors
    /// Implementations report lookup failures as `ChronoError::Source`.
    fn holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, ChronoError>;
}
