//! Built-in array functions and the process-wide name registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::{ChronoError, Stype, StypeEffect};

/// Shared handle to an array-to-array function.
pub type ArrayFn = Arc<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;

/// A named, size-preserving array function.
///
/// Cloning shares the function itself; functions are expected to be pure.
#[derive(Clone)]
pub struct TransformFn {
    name: String,
    func: ArrayFn,
    effect: StypeEffect,
}

impl fmt::Debug for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformFn")
            .field("name", &self.name)
            .field("effect", &self.effect)
            .finish_non_exhaustive()
    }
}

impl TransformFn {
    /// Wrap a closure under a display name.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
            effect: StypeEffect::Preserve,
        }
    }

    /// Declare how the function changes the statistical type.
    #[must_use]
    pub const fn with_effect(mut self, effect: StypeEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Display name, including parameters.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared statistical-type effect.
    #[must_use]
    pub const fn effect(&self) -> StypeEffect {
        self.effect
    }

    /// Run the function.
    #[must_use]
    pub fn call(&self, input: &[f64]) -> Vec<f64> {
        (self.func)(input)
    }

    /// Look up a parameterless built-in by name.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when no function is registered under `name`.
    pub fn named(name: &str) -> Result<Self, ChronoError> {
        REGISTRY
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| ChronoError::TypeMismatch(format!("{name:?} is not a known function")))
    }

    /// Natural logarithm.
    #[must_use]
    pub fn ln() -> Self {
        Self::elementwise("ln", f64::ln).with_effect(StypeEffect::Downgrade(Stype::Interval))
    }

    /// Base-10 logarithm.
    #[must_use]
    pub fn log10() -> Self {
        Self::elementwise("log10", f64::log10).with_effect(StypeEffect::Downgrade(Stype::Interval))
    }

    /// Base-2 logarithm.
    #[must_use]
    pub fn log2() -> Self {
        Self::elementwise("log2", f64::log2).with_effect(StypeEffect::Downgrade(Stype::Interval))
    }

    /// `ln(1 + x)`.
    #[must_use]
    pub fn log1p() -> Self {
        Self::elementwise("log1p", f64::ln_1p).with_effect(StypeEffect::Downgrade(Stype::Interval))
    }

    /// Square root.
    #[must_use]
    pub fn sqrt() -> Self {
        Self::elementwise("sqrt", f64::sqrt).with_effect(StypeEffect::Downgrade(Stype::Ratio))
    }

    /// Reverse the order of the values.
    #[must_use]
    pub fn reverse() -> Self {
        Self::new("reverse", |x: &[f64]| x.iter().rev().copied().collect())
    }

    /// Shift values by `n` positions (positive moves values later), filling
    /// vacated positions with `NaN`.
    #[must_use]
    pub fn shift(n: i64) -> Self {
        Self::new(format!("shift(n={n})"), move |x: &[f64]| {
            let len = x.len();
            let by = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).min(len);
            let mut out = vec![f64::NAN; len];
            if n >= 0 {
                out[by..].copy_from_slice(&x[..len - by]);
            } else {
                out[..len - by].copy_from_slice(&x[by..]);
            }
            out
        })
    }

    /// `1 / (x + add)`.
    #[must_use]
    pub fn inverse(add: f64) -> Self {
        Self::elementwise_with(format!("inverse(add={add})"), move |v| 1.0 / (v + add))
            .with_effect(StypeEffect::Downgrade(Stype::Interval))
    }

    fn elementwise(name: &str, f: fn(f64) -> f64) -> Self {
        Self::elementwise_with(name, f)
    }

    fn elementwise_with<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, move |x: &[f64]| x.iter().map(|v| f(*v)).collect())
    }
}

type Ctor = fn() -> TransformFn;

static REGISTRY: LazyLock<BTreeMap<&'static str, Ctor>> = LazyLock::new(|| {
    let entries: [(&'static str, Ctor); 8] = [
        ("ln", TransformFn::ln),
        ("log", TransformFn::ln),
        ("log10", TransformFn::log10),
        ("log2", TransformFn::log2),
        ("log1p", TransformFn::log1p),
        ("sqrt", TransformFn::sqrt),
        ("reverse", TransformFn::reverse),
        ("flip", TransformFn::reverse),
    ];
    entries.into_iter().collect()
});

/// Names accepted by [`TransformFn::named`].
#[must_use]
pub fn function_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}
