//! Storage dtypes and statistical types.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Storage type of a value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// Two-valued booleans with missing values.
    Bool,
    /// Small-integer enum: codes into a list of string levels.
    Category,
    /// 64-bit signed integers with missing values.
    Int,
    /// 64-bit floats; NaN marks a missing value.
    Float,
    /// Free text with missing values.
    Text,
}

impl Dtype {
    /// Whether the dtype has a numeric view usable by transformations and
    /// resampling.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bool => "bool",
            Self::Category => "category",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
        };
        f.write_str(s)
    }
}

/// Semantic classification of a value sequence, distinct from its dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stype {
    /// Ordered categories without meaningful distances.
    Ordinal,
    /// Unordered categories.
    Categorical,
    /// Two-valued outcome.
    Binary,
    /// Number of successes out of a known number of trials.
    Binomial,
    /// Non-negative event counts.
    Count,
    /// Meaningful differences, arbitrary zero.
    Interval,
    /// Meaningful differences and a true zero.
    Ratio,
}

impl Stype {
    /// Measurement level used to decide whether a change is a downgrade.
    ///
    /// Nominal types sit at 0, ordinal at 1, interval at 2, ratio at 3 and the
    /// integral ratio types (count, binomial) at 4.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Categorical | Self::Binary => 0,
            Self::Ordinal => 1,
            Self::Interval => 2,
            Self::Ratio => 3,
            Self::Count | Self::Binomial => 4,
        }
    }

    /// Whether arithmetic on the values is meaningful.
    #[must_use]
    pub const fn is_quantitative(self) -> bool {
        self.level() >= 2
    }

    /// Infer the statistical type of a column.
    ///
    /// The table is keyed on the dtype, with one refinement for two-valued
    /// data:
    ///
    /// | dtype      | condition                   | stype         |
    /// |------------|-----------------------------|---------------|
    /// | `bool`     |                             | `binary`      |
    /// | `category` | exactly two levels          | `binary`      |
    /// | `category` | otherwise                   | `categorical` |
    /// | `int`      | observed values within {0,1}| `binary`      |
    /// | `int`      | otherwise                   | `interval`    |
    /// | `float`    |                             | `interval`    |
    /// | `text`     |                             | `categorical` |
    ///
    /// `distinct` is the number of distinct non-missing values (levels for
    /// categories) and `zero_one` whether every observed value is 0 or 1.
    #[must_use]
    pub const fn infer(dtype: Dtype, distinct: usize, zero_one: bool) -> Self {
        match dtype {
            Dtype::Bool => Self::Binary,
            Dtype::Category if distinct == 2 => Self::Binary,
            Dtype::Category | Dtype::Text => Self::Categorical,
            Dtype::Int if zero_one && distinct == 2 => Self::Binary,
            Dtype::Int | Dtype::Float => Self::Interval,
        }
    }
}

impl fmt::Display for Stype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ordinal => "ordinal",
            Self::Categorical => "categorical",
            Self::Binary => "binary",
            Self::Binomial => "binomial",
            Self::Count => "count",
            Self::Interval => "interval",
            Self::Ratio => "ratio",
        };
        f.write_str(s)
    }
}

/// How a transformation function changes the statistical type of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StypeEffect {
    /// The statistical type is unchanged.
    #[default]
    Preserve,
    /// Quantitative types above the given level are lowered to it; nominal and
    /// ordinal types are left alone. Never raises the level.
    Downgrade(Stype),
}

impl StypeEffect {
    /// Apply the effect to a statistical type.
    #[must_use]
    pub const fn apply(self, current: Stype) -> Stype {
        match self {
            Self::Preserve => current,
            Self::Downgrade(to) => {
                if current.is_quantitative() && current.level() > to.level() {
                    to
                } else {
                    current
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_table() {
        assert_eq!(Stype::infer(Dtype::Bool, 2, true), Stype::Binary);
        assert_eq!(Stype::infer(Dtype::Float, 10, false), Stype::Interval);
        assert_eq!(Stype::infer(Dtype::Int, 10, false), Stype::Interval);
        assert_eq!(Stype::infer(Dtype::Int, 2, true), Stype::Binary);
        assert_eq!(Stype::infer(Dtype::Int, 1, true), Stype::Interval);
        assert_eq!(Stype::infer(Dtype::Category, 2, false), Stype::Binary);
        assert_eq!(Stype::infer(Dtype::Category, 5, false), Stype::Categorical);
        assert_eq!(Stype::infer(Dtype::Text, 5, false), Stype::Categorical);
    }

    #[test]
    fn downgrade_never_upgrades() {
        let log = StypeEffect::Downgrade(Stype::Interval);
        assert_eq!(log.apply(Stype::Ratio), Stype::Interval);
        assert_eq!(log.apply(Stype::Count), Stype::Interval);
        assert_eq!(log.apply(Stype::Interval), Stype::Interval);
        assert_eq!(log.apply(Stype::Categorical), Stype::Categorical);
        assert_eq!(StypeEffect::Downgrade(Stype::Ratio).apply(Stype::Interval), Stype::Interval);
    }
}
