//! Size-preserving transformation pipelines.

mod functions;

use std::fmt;

pub use functions::{ArrayFn, TransformFn, function_names};

use crate::{ChronoError, Series, Stype};

/// Containers a [`Transformation`] can run on.
///
/// The pipeline reads the numeric values and hands the result back to the
/// container, which keeps any labels it carries.
pub trait Transformable: Sized {
    /// Values fed to the first step.
    fn values(&self) -> &[f64];
    /// Rebuild the container around transformed values of the same length.
    #[must_use]
    fn with_values(self, values: Vec<f64>) -> Self;
}

impl Transformable for Vec<f64> {
    fn values(&self) -> &[f64] {
        self
    }

    fn with_values(self, values: Vec<f64>) -> Self {
        values
    }
}

impl Transformable for Series {
    fn values(&self) -> &[f64] {
        &self.values
    }

    fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }
}

/// An ordered, replayable list of array functions.
///
/// `procedure` is public: callers may inspect or edit it directly. The
/// methods are the checked way to edit it.
///
/// ```
/// use chronoframe_core::{Transformation, TransformFn};
/// let mut t = Transformation::new();
/// t.add(TransformFn::ln())
///     .add(TransformFn::new("double", |x: &[f64]| x.iter().map(|v| v * 2.0).collect()));
/// let out = t.apply(vec![1.0, 10.0, 100.0]).unwrap();
/// assert_eq!(out[0], 0.0);
/// assert!((out[1] - 10f64.ln() * 2.0).abs() < 1e-12);
/// assert_eq!(t.to_string(), "x -> ln -> double");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformation {
    /// Functions in execution order.
    pub procedure: Vec<TransformFn>,
}

impl Transformation {
    /// Empty pipeline (identity).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            procedure: Vec::new(),
        }
    }

    /// Pipeline over an existing procedure.
    #[must_use]
    pub const fn from_procedure(procedure: Vec<TransformFn>) -> Self {
        Self { procedure }
    }

    /// Chain a function onto an owned pipeline.
    #[must_use]
    pub fn then(mut self, f: TransformFn) -> Self {
        self.procedure.push(f);
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn size(&self) -> usize {
        self.procedure.len()
    }

    /// Whether the pipeline is the identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.procedure.is_empty()
    }

    /// Independent copy. Step functions are shared; the list is not.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Execution order as `(position, name)` pairs.
    #[must_use]
    pub fn plan(&self) -> Vec<(usize, String)> {
        self.procedure
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().to_string()))
            .collect()
    }

    /// Step at `pos`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` when `pos` is past the last step.
    pub fn get(&self, pos: usize) -> Result<&TransformFn, ChronoError> {
        self.procedure.get(pos).ok_or(ChronoError::OutOfBounds {
            position: pos,
            len: self.procedure.len(),
        })
    }

    /// Append a step.
    pub fn add(&mut self, f: TransformFn) -> &mut Self {
        self.procedure.push(f);
        self
    }

    /// Append a registered function by name.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when `name` is not registered.
    pub fn add_named(&mut self, name: &str) -> Result<&mut Self, ChronoError> {
        let f = TransformFn::named(name)?;
        Ok(self.add(f))
    }

    /// Insert a step before `pos`; `pos == size()` appends.
    ///
    /// # Errors
    /// Returns `OutOfBounds` when `pos > size()`.
    pub fn insert(&mut self, pos: usize, f: TransformFn) -> Result<&mut Self, ChronoError> {
        if pos > self.procedure.len() {
            return Err(ChronoError::OutOfBounds {
                position: pos,
                len: self.procedure.len(),
            });
        }
        self.procedure.insert(pos, f);
        Ok(self)
    }

    /// Insert a step at the front.
    pub fn insert_first(&mut self, f: TransformFn) -> &mut Self {
        self.procedure.insert(0, f);
        self
    }

    /// Insert a step at the back.
    pub fn insert_last(&mut self, f: TransformFn) -> &mut Self {
        self.add(f)
    }

    /// Remove and return the step at `pos`.
    ///
    /// # Errors
    /// Returns `OutOfBounds` when `pos >= size()`.
    pub fn drop(&mut self, pos: usize) -> Result<TransformFn, ChronoError> {
        if pos >= self.procedure.len() {
            return Err(ChronoError::OutOfBounds {
                position: pos,
                len: self.procedure.len(),
            });
        }
        Ok(self.procedure.remove(pos))
    }

    /// Remove and return the first step.
    ///
    /// # Errors
    /// Returns `OutOfBounds` on an empty pipeline.
    pub fn drop_first(&mut self) -> Result<TransformFn, ChronoError> {
        self.drop(0)
    }

    /// Remove and return the last step.
    ///
    /// # Errors
    /// Returns `OutOfBounds` on an empty pipeline.
    pub fn drop_last(&mut self) -> Result<TransformFn, ChronoError> {
        let last = self.procedure.len().checked_sub(1).ok_or(ChronoError::OutOfBounds {
            position: 0,
            len: 0,
        })?;
        self.drop(last)
    }

    /// Remove every step.
    pub fn clear(&mut self) -> &mut Self {
        self.procedure.clear();
        self
    }

    /// Replace the whole procedure.
    pub fn set_procedure(&mut self, procedure: Vec<TransformFn>) -> &mut Self {
        self.procedure = procedure;
        self
    }

    /// Run every step in order.
    ///
    /// An empty pipeline hands `data` back untouched.
    ///
    /// # Errors
    /// Returns `LengthMismatch` naming the first step whose output length
    /// differs from its input length.
    pub fn apply<D: Transformable>(&self, data: D) -> Result<D, ChronoError> {
        let Some((first, rest)) = self.procedure.split_first() else {
            return Ok(data);
        };
        let mut current = run_step(0, first, data.values())?;
        for (i, f) in rest.iter().enumerate() {
            current = run_step(i + 1, f, &current)?;
        }
        Ok(data.with_values(current))
    }

    /// Fold the declared statistical-type effects over `stype`.
    #[must_use]
    pub fn effect_on(&self, stype: Stype) -> Stype {
        self.procedure
            .iter()
            .fold(stype, |acc, f| f.effect().apply(acc))
    }
}

fn run_step(step: usize, f: &TransformFn, input: &[f64]) -> Result<Vec<f64>, ChronoError> {
    let out = f.call(input);
    if out.len() != input.len() {
        return Err(ChronoError::LengthMismatch {
            step,
            name: f.name().to_string(),
            expected: input.len(),
            actual: out.len(),
        });
    }
    Ok(out)
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("x")?;
        for step in &self.procedure {
            write!(f, " -> {}", step.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halve() -> TransformFn {
        TransformFn::new("halve", |x: &[f64]| x.iter().map(|v| v / 2.0).collect())
    }

    #[test]
    fn positional_edits() {
        let mut t = Transformation::new();
        t.add(TransformFn::ln()).add(halve());
        t.insert(1, TransformFn::sqrt()).unwrap();
        t.insert_first(TransformFn::reverse());
        assert_eq!(t.to_string(), "x -> reverse -> ln -> sqrt -> halve");
        assert_eq!(t.plan()[2], (2, "sqrt".to_string()));
        assert_eq!(t.drop_last().unwrap().name(), "halve");
        assert_eq!(t.drop_first().unwrap().name(), "reverse");
        assert_eq!(t.size(), 2);
        assert_eq!(
            t.drop(7).unwrap_err(),
            ChronoError::OutOfBounds { position: 7, len: 2 }
        );
        assert!(t.insert(3, halve()).is_err());
        t.clear();
        assert!(t.drop_last().is_err());
        assert_eq!(t.to_string(), "x");
    }

    #[test]
    fn shortening_step_is_reported() {
        let mut t = Transformation::new();
        t.add(halve())
            .add(TransformFn::new("head", |x: &[f64]| x[..1].to_vec()));
        let err = t.apply(vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            ChronoError::LengthMismatch {
                step: 1,
                name: "head".into(),
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn effects_fold_in_order() {
        let t = Transformation::new().then(TransformFn::ln());
        assert_eq!(t.effect_on(Stype::Ratio), Stype::Interval);
        assert_eq!(t.effect_on(Stype::Binary), Stype::Binary);
    }
}
