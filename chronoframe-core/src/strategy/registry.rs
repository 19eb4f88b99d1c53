//! Process-wide tables of named strategies.
//!
//! Built once on first use and never mutated afterwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// How a named missing-value strategy acts on a column.
#[derive(Clone, Copy)]
pub(crate) enum NaKernel {
    /// Leave the values untouched.
    AsIs,
    /// Remove missing positions together with their index points.
    Drop,
    /// Carry the last present value forward.
    Forward,
    /// Carry the next present value backward.
    Backward,
    /// Fill with the most frequent present value.
    Mode,
    /// Numeric rewrite of the whole column.
    Numeric(fn(&[f64]) -> Vec<f64>),
}

/// How a named upsample strategy fills non-anchor grid points.
#[derive(Clone, Copy)]
pub(crate) enum UpKernel {
    Forward,
    Backward,
    Linear,
}

pub(crate) type DownKernel = fn(&[f64]) -> f64;

pub(crate) static NA_STRATEGIES: LazyLock<BTreeMap<&'static str, NaKernel>> =
    LazyLock::new(|| {
        BTreeMap::from([
            ("asis", NaKernel::AsIs),
            ("drop", NaKernel::Drop),
            ("ffill", NaKernel::Forward),
            ("pad", NaKernel::Forward),
            ("bfill", NaKernel::Backward),
            ("backfill", NaKernel::Backward),
            ("mode", NaKernel::Mode),
            ("mean", NaKernel::Numeric(fill_mean)),
            ("median", NaKernel::Numeric(fill_median)),
            ("zero", NaKernel::Numeric(fill_zero)),
            ("linear", NaKernel::Numeric(interpolate_linear)),
        ])
    });

pub(crate) static UP_STRATEGIES: LazyLock<BTreeMap<&'static str, UpKernel>> =
    LazyLock::new(|| {
        BTreeMap::from([
            ("ffill", UpKernel::Forward),
            ("pad", UpKernel::Forward),
            ("bfill", UpKernel::Backward),
            ("backfill", UpKernel::Backward),
            ("linear", UpKernel::Linear),
        ])
    });

pub(crate) static DOWN_STRATEGIES: LazyLock<BTreeMap<&'static str, DownKernel>> =
    LazyLock::new(|| {
        BTreeMap::from([
            ("mean", agg_mean as DownKernel),
            ("sum", agg_sum),
            ("first", agg_first),
            ("last", agg_last),
            ("min", agg_min),
            ("max", agg_max),
            ("median", agg_median),
            ("count", agg_count),
        ])
    });

/// Registered missing-value strategy names.
#[must_use]
pub fn na_strategy_names() -> Vec<&'static str> {
    NA_STRATEGIES.keys().copied().collect()
}

/// Registered upsample strategy names.
#[must_use]
pub fn up_strategy_names() -> Vec<&'static str> {
    UP_STRATEGIES.keys().copied().collect()
}

/// Registered downsample strategy names.
#[must_use]
pub fn down_strategy_names() -> Vec<&'static str> {
    DOWN_STRATEGIES.keys().copied().collect()
}

fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

#[allow(clippy::cast_precision_loss)]
fn agg_mean(values: &[f64]) -> f64 {
    let xs = finite(values);
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn agg_sum(values: &[f64]) -> f64 {
    finite(values).iter().sum()
}

fn agg_first(values: &[f64]) -> f64 {
    values.iter().copied().find(|v| v.is_finite()).unwrap_or(f64::NAN)
}

fn agg_last(values: &[f64]) -> f64 {
    values.iter().rev().copied().find(|v| v.is_finite()).unwrap_or(f64::NAN)
}

fn agg_min(values: &[f64]) -> f64 {
    finite(values).into_iter().reduce(f64::min).unwrap_or(f64::NAN)
}

fn agg_max(values: &[f64]) -> f64 {
    finite(values).into_iter().reduce(f64::max).unwrap_or(f64::NAN)
}

fn agg_median(values: &[f64]) -> f64 {
    let mut xs = finite(values);
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.sort_by(f64::total_cmp);
    let mid = xs.len() / 2;
    if xs.len() % 2 == 1 {
        xs[mid]
    } else {
        (xs[mid - 1] + xs[mid]) / 2.0
    }
}

#[allow(clippy::cast_precision_loss)]
fn agg_count(values: &[f64]) -> f64 {
    finite(values).len() as f64
}

fn fill_with(values: &[f64], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| if v.is_nan() { fill } else { *v })
        .collect()
}

fn fill_mean(values: &[f64]) -> Vec<f64> {
    fill_with(values, agg_mean(values))
}

fn fill_median(values: &[f64]) -> Vec<f64> {
    fill_with(values, agg_median(values))
}

fn fill_zero(values: &[f64]) -> Vec<f64> {
    fill_with(values, 0.0)
}

/// Fill `NaN` between present values by positional linear interpolation.
/// Trailing gaps hold the last present value, leading gaps stay missing.
pub(crate) fn interpolate_linear(values: &[f64]) -> Vec<f64> {
    let present: Vec<bool> = values.iter().map(|v| !v.is_nan()).collect();
    interpolate_between(values, &present)
}

/// Linear interpolation over the positions not flagged in `keep`, using the
/// flagged positions that hold a number as anchors.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn interpolate_between(values: &[f64], keep: &[bool]) -> Vec<f64> {
    let mut out = values.to_vec();
    let anchors: Vec<usize> = (0..values.len())
        .filter(|&i| keep[i] && !values[i].is_nan())
        .collect();
    for pair in anchors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (va, vb) = (values[a], values[b]);
        for i in a + 1..b {
            if !keep[i] {
                let t = (i - a) as f64 / (b - a) as f64;
                out[i] = va + (vb - va) * t;
            }
        }
    }
    if let Some(&last) = anchors.last() {
        for i in last + 1..values.len() {
            if !keep[i] {
                out[i] = values[last];
            }
        }
    }
    out
}
