//! One-shot cleaning of raw values: infinity handling, then the NaN strategy.

use std::collections::BTreeMap;

use crate::strategy::registry::{NA_STRATEGIES, NaKernel};
use crate::{ChronoError, InfHandling, NaStrategy, TimeIndex, Values};

fn apply_inf(values: &Values, inf: InfHandling) -> Values {
    let Values::Float(v) = values else {
        return values.clone();
    };
    let replacement = match inf {
        InfHandling::AsIs => return values.clone(),
        InfHandling::AsNa => f64::NAN,
        InfHandling::Zero => 0.0,
        InfHandling::Value(x) => x,
    };
    Values::Float(
        v.iter()
            .map(|x| if x.is_infinite() { replacement } else { *x })
            .collect(),
    )
}

fn missing_positions(values: &Values) -> Vec<usize> {
    values
        .missing_mask()
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.then_some(i))
        .collect()
}

fn fill_forward<T: Clone>(v: &mut [Option<T>]) {
    let mut last: Option<T> = None;
    for slot in v.iter_mut() {
        match slot {
            Some(x) => last = Some(x.clone()),
            None => slot.clone_from(&last),
        }
    }
}

fn fill_backward<T: Clone>(v: &mut [Option<T>]) {
    let mut next: Option<T> = None;
    for slot in v.iter_mut().rev() {
        match slot {
            Some(x) => next = Some(x.clone()),
            None => slot.clone_from(&next),
        }
    }
}

/// Most frequent present value, smallest on ties.
fn mode_of<K: Ord + Clone>(keys: impl Iterator<Item = K>) -> Option<K> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for k in keys {
        *counts.entry(k).or_default() += 1;
    }
    let best = counts.values().copied().max()?;
    counts.into_iter().find(|(_, c)| *c == best).map(|(k, _)| k)
}

fn fill_mode<T: Clone + Ord>(v: &mut [Option<T>]) {
    if let Some(m) = mode_of(v.iter().flatten().cloned()) {
        for slot in v.iter_mut().filter(|s| s.is_none()) {
            *slot = Some(m.clone());
        }
    }
}

fn positional<T: Clone + Ord>(v: &mut [Option<T>], kernel: NaKernel) {
    match kernel {
        NaKernel::Forward => fill_forward(v),
        NaKernel::Backward => fill_backward(v),
        NaKernel::Mode => fill_mode(v),
        _ => {}
    }
}

fn positional_float(v: &mut Vec<f64>, kernel: NaKernel) {
    if let NaKernel::Mode = kernel {
        let best = mode_of(
            v.iter()
                .filter(|x| !x.is_nan())
                .map(|x| OrderedBits(*x)),
        );
        if let Some(OrderedBits(m)) = best {
            for x in v.iter_mut().filter(|x| x.is_nan()) {
                *x = m;
            }
        }
        return;
    }
    let mut opts: Vec<Option<f64>> = v.iter().map(|x| (!x.is_nan()).then_some(*x)).collect();
    match kernel {
        NaKernel::Forward => fill_forward(&mut opts),
        NaKernel::Backward => fill_backward(&mut opts),
        _ => {}
    }
    *v = opts.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect();
}

#[derive(Clone, Copy, PartialEq)]
struct OrderedBits(f64);

impl Eq for OrderedBits {}

impl PartialOrd for OrderedBits {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedBits {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn apply_positional(values: &mut Values, kernel: NaKernel) {
    match values {
        Values::Float(v) => positional_float(v, kernel),
        Values::Int(v) => positional(v, kernel),
        Values::Bool(v) => positional(v, kernel),
        Values::Category { codes, .. } => positional(codes, kernel),
        Values::Text(v) => positional(v, kernel),
    }
}

fn numeric_rewrite(
    values: &Values,
    label: &str,
    f: impl Fn(&[f64]) -> Vec<f64>,
) -> Result<Values, ChronoError> {
    if !values.dtype().is_numeric() {
        return Err(ChronoError::IncompatibleStrategy(format!(
            "{label} needs numeric values, got {}",
            values.dtype()
        )));
    }
    let input = values.to_f64()?;
    let out = f(&input);
    if out.len() != input.len() {
        return Err(ChronoError::IncompatibleStrategy(format!(
            "{label} returned {} values for {} inputs",
            out.len(),
            input.len()
        )));
    }
    Ok(Values::Float(out))
}

/// Clean raw values: infinities first, then the missing-value strategy.
///
/// Returns the index and values of the stored baseline; only the `drop`
/// strategy changes the index.
pub(crate) fn clean(
    index: &TimeIndex,
    raw: &Values,
    inf: InfHandling,
    na: &NaStrategy,
) -> Result<(TimeIndex, Values), ChronoError> {
    let mut values = apply_inf(raw, inf);
    match na {
        NaStrategy::Named(name) => {
            let kernel = NA_STRATEGIES.get(name.as_str()).copied().ok_or_else(|| {
                ChronoError::IncompatibleStrategy(format!(
                    "unknown missing-value strategy {name:?}"
                ))
            })?;
            match kernel {
                NaKernel::AsIs => {}
                NaKernel::Drop => {
                    let mask = values.missing_mask();
                    let keep: Vec<usize> = (0..mask.len()).filter(|&i| !mask[i]).collect();
                    return Ok((index.take(&keep), values.take(&keep)));
                }
                NaKernel::Forward | NaKernel::Backward | NaKernel::Mode => {
                    apply_positional(&mut values, kernel);
                }
                NaKernel::Numeric(f) => values = numeric_rewrite(&values, name, f)?,
            }
        }
        NaStrategy::Scalar(s) => {
            let missing = missing_positions(&values);
            values.fill_positions(&missing, s)?;
        }
        NaStrategy::Keyed(map) => {
            for i in missing_positions(&values) {
                if let Some(s) = index.label(i).and_then(|label| map.get(&label)) {
                    values.fill_positions(&[i], s)?;
                }
            }
        }
        NaStrategy::Custom(f) => values = numeric_rewrite(&values, "custom strategy", |x| f(x))?,
    }
    Ok((index.clone(), values))
}
