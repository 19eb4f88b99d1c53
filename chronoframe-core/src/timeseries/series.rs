use crate::TimeIndex;

/// Numeric values paired with their temporal index.
///
/// This is what [`crate::Timeseries::series`] hands out after running the
/// owned transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Index of the values.
    pub index: TimeIndex,
    /// Values, `NaN` where missing.
    pub values: Vec<f64>,
}

impl Series {
    /// Pair values with an index.
    #[must_use]
    pub const fn new(index: TimeIndex, values: Vec<f64>) -> Self {
        Self { index, values }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, value)` pairs.
    #[must_use]
    pub fn labelled(&self) -> Vec<(String, f64)> {
        self.index.labels().into_iter().zip(self.values.iter().copied()).collect()
    }
}
