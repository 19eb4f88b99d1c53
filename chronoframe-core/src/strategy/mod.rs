//! Missing-value, upsample and downsample strategies.
//!
//! A strategy is a registered name, a scalar fill, a keyed fill (index label
//! to value), or a user function. Names are validated when a strategy is
//! assigned so failures surface at the setter, not during resampling.

pub(crate) mod registry;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use registry::{down_strategy_names, na_strategy_names, up_strategy_names};

use crate::{ChronoError, Scalar, TimeIndex};

/// User cleaning function: raw values in, cleaned values of equal length out.
pub type NaFn = Arc<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;
/// User upsampling function: `(old index, old values, new index)` to values
/// for every point of the new index.
pub type UpFn = Arc<dyn Fn(&TimeIndex, &[f64], &TimeIndex) -> Vec<f64> + Send + Sync>;
/// User aggregation function: the values of one bucket to a single value.
pub type DownFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Missing-value strategy applied once when a series is cleaned.
#[derive(Clone)]
pub enum NaStrategy {
    /// A registered strategy (`asis`, `ffill`, `drop`, `mean`, ...).
    Named(String),
    /// Replace every missing value with a constant.
    Scalar(Scalar),
    /// Replace missing values at the given index labels.
    Keyed(BTreeMap<String, Scalar>),
    /// A user function over the whole column.
    Custom(NaFn),
}

/// Strategy that fills grid points created by upsampling.
#[derive(Clone)]
pub enum UpStrategy {
    /// A registered strategy (`ffill`, `bfill`, `linear`).
    Named(String),
    /// Fill every new point with a constant.
    Scalar(Scalar),
    /// Fill new points at the given index labels; others are `NaN`.
    Keyed(BTreeMap<String, Scalar>),
    /// A user function.
    Custom(UpFn),
}

/// Aggregation used when downsampling.
#[derive(Clone)]
pub enum DownStrategy {
    /// A registered aggregator (`mean`, `sum`, `first`, `last`, `min`, `max`,
    /// `median`, `count`).
    Named(String),
    /// A user aggregator.
    Custom(DownFn),
}

macro_rules! strategy_common {
    ($ty:ident, $table:expr, $role:literal) => {
        impl $ty {
            /// Name of a registered strategy, if this is one.
            #[must_use]
            pub fn name(&self) -> Option<&str> {
                match self {
                    Self::Named(n) => Some(n.as_str()),
                    _ => None,
                }
            }

            /// Check that a named strategy is registered.
            ///
            /// # Errors
            /// Returns `IncompatibleStrategy` for an unknown name.
            pub fn validate(&self) -> Result<(), ChronoError> {
                match self {
                    Self::Named(n) if !$table.contains_key(n.as_str()) => {
                        Err(ChronoError::IncompatibleStrategy(format!(
                            "unknown {} strategy {n:?}",
                            $role
                        )))
                    }
                    _ => Ok(()),
                }
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self::Named(name.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(name: String) -> Self {
                Self::Named(name)
            }
        }
    };
}

strategy_common!(NaStrategy, registry::NA_STRATEGIES, "missing-value");
strategy_common!(UpStrategy, registry::UP_STRATEGIES, "upsample");
strategy_common!(DownStrategy, registry::DOWN_STRATEGIES, "downsample");

impl NaStrategy {
    /// Wrap a cleaning closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Whether missing values pass through untouched.
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.name() == Some("asis")
    }
}

impl UpStrategy {
    /// Wrap an upsampling closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&TimeIndex, &[f64], &TimeIndex) -> Vec<f64> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl DownStrategy {
    /// Wrap an aggregation closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl From<f64> for NaStrategy {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Float(v))
    }
}

impl From<Scalar> for NaStrategy {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<BTreeMap<String, Scalar>> for NaStrategy {
    fn from(v: BTreeMap<String, Scalar>) -> Self {
        Self::Keyed(v)
    }
}

impl From<f64> for UpStrategy {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Float(v))
    }
}

impl From<BTreeMap<String, Scalar>> for UpStrategy {
    fn from(v: BTreeMap<String, Scalar>) -> Self {
        Self::Keyed(v)
    }
}

fn fmt_variant(
    f: &mut fmt::Formatter<'_>,
    kind: &str,
    named: Option<&str>,
    scalar: Option<&Scalar>,
    keyed: Option<usize>,
) -> fmt::Result {
    match (named, scalar, keyed) {
        (Some(n), _, _) => write!(f, "{kind}::Named({n:?})"),
        (_, Some(s), _) => write!(f, "{kind}::Scalar({s:?})"),
        (_, _, Some(k)) => write!(f, "{kind}::Keyed({k} keys)"),
        _ => write!(f, "{kind}::Custom(..)"),
    }
}

impl fmt::Debug for NaStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => fmt_variant(f, "NaStrategy", Some(n), None, None),
            Self::Scalar(s) => fmt_variant(f, "NaStrategy", None, Some(s), None),
            Self::Keyed(m) => fmt_variant(f, "NaStrategy", None, None, Some(m.len())),
            Self::Custom(_) => fmt_variant(f, "NaStrategy", None, None, None),
        }
    }
}

impl fmt::Debug for UpStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => fmt_variant(f, "UpStrategy", Some(n), None, None),
            Self::Scalar(s) => fmt_variant(f, "UpStrategy", None, Some(s), None),
            Self::Keyed(m) => fmt_variant(f, "UpStrategy", None, None, Some(m.len())),
            Self::Custom(_) => fmt_variant(f, "UpStrategy", None, None, None),
        }
    }
}

impl fmt::Debug for DownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => fmt_variant(f, "DownStrategy", Some(n), None, None),
            Self::Custom(_) => fmt_variant(f, "DownStrategy", None, None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_incompatible() {
        assert!(NaStrategy::from("ffill").validate().is_ok());
        assert!(matches!(
            NaStrategy::from("interpolate").validate(),
            Err(ChronoError::IncompatibleStrategy(_))
        ));
        assert!(UpStrategy::from("mean").validate().is_err());
        assert!(DownStrategy::from("linear").validate().is_err());
        assert!(NaStrategy::from(0.0).validate().is_ok());
    }

    #[test]
    fn debug_hides_closures() {
        let s = DownStrategy::custom(|xs: &[f64]| xs.len() as f64);
        assert_eq!(format!("{s:?}"), "DownStrategy::Custom(..)");
        assert_eq!(format!("{:?}", NaStrategy::from("pad")), "NaStrategy::Named(\"pad\")");
    }
}
