//! Typed value columns and scalar fill values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{ChronoError, Dtype, Stype};

/// A single value used for scalar and keyed fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Floating point value.
    Float(f64),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(String),
}

impl Scalar {
    /// Numeric view of the scalar; text is parsed.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(b) => Some(i64::from(*b)),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn to_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(v) => Some(*v != 0),
            Self::Float(v) if v.is_nan() => None,
            Self::Float(v) => Some(*v != 0.0),
            Self::Text(s) => parse_bool(s),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Float(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// An ordered column of values of one dtype.
///
/// Missing values are `NaN` for floats and `None` everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Values {
    /// 64-bit floats.
    Float(Vec<f64>),
    /// 64-bit integers.
    Int(Vec<Option<i64>>),
    /// Booleans.
    Bool(Vec<Option<bool>>),
    /// Codes into `levels`.
    Category {
        /// Per-position level code.
        codes: Vec<Option<u32>>,
        /// Level labels in first-appearance order.
        levels: Vec<String>,
    },
    /// Free text.
    Text(Vec<Option<String>>),
}

impl Values {
    /// Build a category column, assigning codes in first-appearance order.
    pub fn categorical<S: AsRef<str>>(labels: impl IntoIterator<Item = Option<S>>) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let mut lookup: BTreeMap<String, u32> = BTreeMap::new();
        let codes = labels
            .into_iter()
            .map(|label| {
                let label = label?;
                let label = label.as_ref();
                if let Some(code) = lookup.get(label) {
                    return Some(*code);
                }
                let code = u32::try_from(levels.len()).ok()?;
                levels.push(label.to_string());
                lookup.insert(label.to_string(), code);
                Some(code)
            })
            .collect();
        Self::Category { codes, levels }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Category { codes, .. } => codes.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage dtype.
    #[must_use]
    pub const fn dtype(&self) -> Dtype {
        match self {
            Self::Float(_) => Dtype::Float,
            Self::Int(_) => Dtype::Int,
            Self::Bool(_) => Dtype::Bool,
            Self::Category { .. } => Dtype::Category,
            Self::Text(_) => Dtype::Text,
        }
    }

    /// Per-position missing flags.
    #[must_use]
    pub fn missing_mask(&self) -> Vec<bool> {
        match self {
            Self::Float(v) => v.iter().map(|x| x.is_nan()).collect(),
            Self::Int(v) => v.iter().map(Option::is_none).collect(),
            Self::Bool(v) => v.iter().map(Option::is_none).collect(),
            Self::Category { codes, .. } => codes.iter().map(Option::is_none).collect(),
            Self::Text(v) => v.iter().map(Option::is_none).collect(),
        }
    }

    /// Per-position infinity flags; only floats can hold infinities.
    #[must_use]
    pub fn infinite_mask(&self) -> Vec<bool> {
        match self {
            Self::Float(v) => v.iter().map(|x| x.is_infinite()).collect(),
            other => vec![false; other.len()],
        }
    }

    /// Numeric view of the column. Missing values become `NaN`; booleans map
    /// to 0/1 and categories to their codes.
    ///
    /// # Errors
    /// Returns `TypeMismatch` for text columns.
    pub fn to_f64(&self) -> Result<Vec<f64>, ChronoError> {
        #[allow(clippy::cast_precision_loss)]
        let out = match self {
            Self::Float(v) => v.clone(),
            Self::Int(v) => v.iter().map(|x| x.map_or(f64::NAN, |x| x as f64)).collect(),
            Self::Bool(v) => v
                .iter()
                .map(|x| x.map_or(f64::NAN, |b| f64::from(u8::from(b))))
                .collect(),
            Self::Category { codes, .. } => codes
                .iter()
                .map(|x| x.map_or(f64::NAN, f64::from))
                .collect(),
            Self::Text(_) => {
                return Err(ChronoError::TypeMismatch(
                    "text values have no numeric view".into(),
                ));
            }
        };
        Ok(out)
    }

    /// Select positions, in the given order.
    #[must_use]
    pub fn take(&self, positions: &[usize]) -> Self {
        fn pick<T: Clone>(v: &[T], positions: &[usize]) -> Vec<T> {
            positions.iter().filter_map(|&i| v.get(i).cloned()).collect()
        }
        match self {
            Self::Float(v) => Self::Float(pick(v, positions)),
            Self::Int(v) => Self::Int(pick(v, positions)),
            Self::Bool(v) => Self::Bool(pick(v, positions)),
            Self::Category { codes, levels } => Self::Category {
                codes: pick(codes, positions),
                levels: levels.clone(),
            },
            Self::Text(v) => Self::Text(pick(v, positions)),
        }
    }

    /// Text form of every position; categories resolve to their level.
    fn to_text(&self) -> Vec<Option<String>> {
        match self {
            Self::Float(v) => v
                .iter()
                .map(|x| (!x.is_nan()).then(|| x.to_string()))
                .collect(),
            Self::Int(v) => v.iter().map(|x| x.map(|x| x.to_string())).collect(),
            Self::Bool(v) => v.iter().map(|x| x.map(|b| b.to_string())).collect(),
            Self::Category { codes, levels } => codes
                .iter()
                .map(|c| c.and_then(|c| levels.get(c as usize).cloned()))
                .collect(),
            Self::Text(v) => v.clone(),
        }
    }

    /// Cast the column to another dtype.
    ///
    /// Floats truncate toward zero when cast to integers and `NaN` becomes
    /// missing; numbers cast to booleans are `true` when non-zero; text and
    /// category levels are parsed when cast to numeric or boolean dtypes.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when a present value has no representation in
    /// the target dtype (unparseable text, infinities cast to integers).
    pub fn cast(&self, to: Dtype) -> Result<Self, ChronoError> {
        if self.dtype() == to {
            return Ok(self.clone());
        }
        match to {
            Dtype::Float => match self {
                Self::Text(_) | Self::Category { .. } => {
                    let parsed = self
                        .to_text()
                        .into_iter()
                        .map(|s| s.map_or(Ok(f64::NAN), |s| parse_or_mismatch(&s, "float")))
                        .collect::<Result<Vec<f64>, _>>()?;
                    Ok(Self::Float(parsed))
                }
                other => other.to_f64().map(Self::Float),
            },
            Dtype::Int => {
                let out = match self {
                    Self::Float(v) => v
                        .iter()
                        .map(|&x| float_to_int(x))
                        .collect::<Result<Vec<_>, _>>()?,
                    Self::Bool(v) => v.iter().map(|b| b.map(i64::from)).collect(),
                    _ => self
                        .to_text()
                        .into_iter()
                        .map(|s| s.map(|s| parse_or_mismatch::<i64>(&s, "int")).transpose())
                        .collect::<Result<Vec<_>, _>>()?,
                };
                Ok(Self::Int(out))
            }
            Dtype::Bool => {
                let out = match self {
                    Self::Float(v) => v
                        .iter()
                        .map(|&x| (!x.is_nan()).then_some(x != 0.0))
                        .collect(),
                    Self::Int(v) => v.iter().map(|x| x.map(|x| x != 0)).collect(),
                    _ => self
                        .to_text()
                        .into_iter()
                        .map(|s| {
                            s.map(|s| {
                                parse_bool(&s).ok_or_else(|| {
                                    ChronoError::TypeMismatch(format!("cannot cast {s:?} to bool"))
                                })
                            })
                            .transpose()
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                };
                Ok(Self::Bool(out))
            }
            Dtype::Text => Ok(Self::Text(self.to_text())),
            Dtype::Category => Ok(Self::categorical(self.to_text())),
        }
    }

    /// Infer the statistical type from the dtype and the observed values.
    #[must_use]
    pub fn infer_stype(&self) -> Stype {
        let (distinct, zero_one) = match self {
            Self::Int(v) => {
                let seen: BTreeSet<i64> = v.iter().flatten().copied().collect();
                let zero_one = seen.iter().all(|x| *x == 0 || *x == 1);
                (seen.len(), zero_one)
            }
            Self::Category { levels, .. } => (levels.len(), false),
            _ => (0, false),
        };
        Stype::infer(self.dtype(), distinct, zero_one)
    }

    /// Overwrite the given positions with `value` converted to this dtype.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the scalar cannot be represented.
    pub(crate) fn fill_positions(
        &mut self,
        positions: &[usize],
        value: &Scalar,
    ) -> Result<(), ChronoError> {
        let dtype = self.dtype();
        let mismatch =
            || ChronoError::TypeMismatch(format!("cannot fill {dtype} column with {value:?}"));
        match self {
            Self::Float(v) => {
                let x = value.to_f64().ok_or_else(mismatch)?;
                set_all(v, positions, x);
            }
            Self::Int(v) => {
                let x = value.to_i64().ok_or_else(mismatch)?;
                set_all(v, positions, Some(x));
            }
            Self::Bool(v) => {
                let x = value.to_bool().ok_or_else(mismatch)?;
                set_all(v, positions, Some(x));
            }
            Self::Text(v) => set_all(v, positions, Some(value.to_text())),
            Self::Category { codes, levels } => {
                let label = value.to_text();
                let code = match levels.iter().position(|l| *l == label) {
                    Some(pos) => pos,
                    None => {
                        levels.push(label);
                        levels.len() - 1
                    }
                };
                let code = u32::try_from(code).map_err(|_| mismatch())?;
                set_all(codes, positions, Some(code));
            }
        }
        Ok(())
    }
}

fn set_all<T: Clone>(v: &mut [T], positions: &[usize], x: T) {
    for &i in positions {
        if let Some(slot) = v.get_mut(i) {
            *slot = x.clone();
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "1" => Some(true),
        "false" | "f" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_or_mismatch<T: core::str::FromStr>(s: &str, target: &str) -> Result<T, ChronoError> {
    s.trim()
        .parse()
        .map_err(|_| ChronoError::TypeMismatch(format!("cannot cast {s:?} to {target}")))
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn float_to_int(x: f64) -> Result<Option<i64>, ChronoError> {
    if x.is_nan() {
        return Ok(None);
    }
    if !x.is_finite() || x.abs() >= i64::MAX as f64 {
        return Err(ChronoError::TypeMismatch(format!("cannot cast {x} to int")));
    }
    Ok(Some(x.trunc() as i64))
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Self::Float(v)
    }
}

impl From<&[f64]> for Values {
    fn from(v: &[f64]) -> Self {
        Self::Float(v.to_vec())
    }
}

impl From<Vec<i64>> for Values {
    fn from(v: Vec<i64>) -> Self {
        Self::Int(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<i64>>> for Values {
    fn from(v: Vec<Option<i64>>) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<bool>> for Values {
    fn from(v: Vec<bool>) -> Self {
        Self::Bool(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for Values {
    fn from(v: Vec<&str>) -> Self {
        Self::Text(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<String>> for Values {
    fn from(v: Vec<String>) -> Self {
        Self::Text(v.into_iter().map(Some).collect())
    }
}
