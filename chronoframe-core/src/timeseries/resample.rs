//! Frequency conversion of a single numeric series.
//!
//! Downsampling groups points by the bucket start of the target frequency and
//! aggregates each bucket; upsampling lays a finer grid over the span of the
//! series and fills the points between the original anchors.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::index::zone;
use crate::strategy::registry::{DOWN_STRATEGIES, UP_STRATEGIES, UpKernel, interpolate_between};
use crate::{
    ChronoError, DownStrategy, Frequency, IndexKind, IndexPoints, ResampleDirection, TimeIndex,
    UpStrategy,
};

/// What to resample onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResampleTarget {
    /// A frequency; the grid is derived from the series' own span.
    Freq(Frequency),
    /// An explicit index: resample to its frequency, then align onto its points.
    Index(TimeIndex),
}

impl From<Frequency> for ResampleTarget {
    fn from(f: Frequency) -> Self {
        Self::Freq(f)
    }
}

impl From<TimeIndex> for ResampleTarget {
    fn from(i: TimeIndex) -> Self {
        Self::Index(i)
    }
}

impl From<&TimeIndex> for ResampleTarget {
    fn from(i: &TimeIndex) -> Self {
        Self::Index(i.clone())
    }
}

impl FromStr for ResampleTarget {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::Freq)
    }
}

impl ResampleTarget {
    /// Frequency of the target: declared or inferred for index targets.
    ///
    /// # Errors
    /// Returns `IncompatibleFrequency` when an index target has no regular step.
    pub fn freq(&self) -> Result<Frequency, ChronoError> {
        match self {
            Self::Freq(f) => Ok(f.clone()),
            Self::Index(i) => i.effective_freq().ok_or_else(|| {
                ChronoError::IncompatibleFrequency("target index has no regular step".into())
            }),
        }
    }
}

/// Knobs for [`crate::Timeseries::resample_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleOptions {
    /// Resample the raw values, skipping cleaning and transformation.
    pub use_original: bool,
}

/// Classify a conversion from `from` to `to`.
///
/// Identical frequencies are a no-op, a shorter nominal step is an upsample,
/// anything else (including a different grid of equal nominal length) is a
/// downsample.
#[must_use]
pub fn resample_direction(from: &Frequency, to: &Frequency) -> ResampleDirection {
    if from == to {
        ResampleDirection::NoOp
    } else if to.nominal_seconds() < from.nominal_seconds() {
        ResampleDirection::Upsample
    } else {
        ResampleDirection::Downsample
    }
}

/// Output of [`resample_values`].
#[derive(Debug, Clone)]
pub(crate) struct Resampled {
    pub index: TimeIndex,
    pub values: Vec<f64>,
}

/// Uniform key for grid arithmetic: instants for timestamps, period starts
/// for periods, offsets for durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Key {
    Instant(DateTime<Utc>),
    Start(NaiveDateTime),
    Offset(TimeDelta),
}

struct Grid<'a> {
    source: &'a TimeIndex,
    freq: &'a Frequency,
}

impl Grid<'_> {
    fn keys(&self) -> Vec<Key> {
        match self.source.points() {
            IndexPoints::Timestamps(v) => v.iter().map(|t| Key::Instant(*t)).collect(),
            IndexPoints::Periods(v) => v.iter().map(|p| Key::Start(*p)).collect(),
            IndexPoints::Durations(v) => v.iter().map(|d| Key::Offset(*d)).collect(),
        }
    }

    fn floor(&self, key: Key) -> Option<Key> {
        match key {
            Key::Instant(t) => {
                zone::floor_instant(t, self.freq, self.source.tz()).map(Key::Instant)
            }
            Key::Start(p) => self.freq.floor(p).map(Key::Start),
            Key::Offset(d) => self.freq.floor_offset(d).map(Key::Offset),
        }
    }

    fn advance(&self, key: Key) -> Option<Key> {
        match key {
            Key::Instant(t) => {
                zone::advance_instant(t, self.freq, self.source.tz()).map(Key::Instant)
            }
            Key::Start(p) => self.freq.advance(p).map(Key::Start),
            Key::Offset(d) => self
                .freq
                .fixed_step()
                .and_then(|s| d.checked_add(&s))
                .map(Key::Offset),
        }
    }

    /// Every grid key from `first` while `keep` holds.
    fn walk(&self, first: Key, keep: impl Fn(Key) -> bool) -> Result<Vec<Key>, ChronoError> {
        let mut out = Vec::new();
        let mut cur = first;
        while keep(cur) {
            out.push(cur);
            cur = self.advance(cur).ok_or_else(overflow)?;
        }
        Ok(out)
    }

    fn index(&self, keys: &[Key]) -> TimeIndex {
        let points = match self.source.kind() {
            IndexKind::Timestamp => IndexPoints::Timestamps(
                keys.iter()
                    .filter_map(|k| match k {
                        Key::Instant(t) => Some(*t),
                        _ => None,
                    })
                    .collect(),
            ),
            IndexKind::Period => IndexPoints::Periods(
                keys.iter()
                    .filter_map(|k| match k {
                        Key::Start(p) => Some(*p),
                        _ => None,
                    })
                    .collect(),
            ),
            IndexKind::Duration => IndexPoints::Durations(
                keys.iter()
                    .filter_map(|k| match k {
                        Key::Offset(d) => Some(*d),
                        _ => None,
                    })
                    .collect(),
            ),
        };
        self.source.rebuilt(points, Some(self.freq.clone()))
    }
}

fn overflow() -> ChronoError {
    ChronoError::IncompatibleFrequency("resample grid leaves the supported calendar".into())
}

/// Resample `values` on `index` to `target`.
///
/// # Errors
/// `IncompatibleFrequency` when either frequency is unknown, the target has
/// no grid for the index kind, or source points miss the upsample grid;
/// `IncompatibleStrategy` when a strategy is unknown or a user upsampler
/// returns the wrong number of values.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "chronoframe_core::resample",
        skip(index, values, up, down),
        fields(len = values.len(), kind = ?index.kind()),
    )
)]
pub(crate) fn resample_values(
    index: &TimeIndex,
    values: &[f64],
    target: &ResampleTarget,
    up: &UpStrategy,
    down: &DownStrategy,
) -> Result<Resampled, ChronoError> {
    let to = target.freq()?;
    if index.kind() == IndexKind::Duration && !to.is_fixed() {
        return Err(ChronoError::IncompatibleFrequency(format!(
            "duration indexes have no {to} grid"
        )));
    }

    let direction = match index.effective_freq() {
        Some(from) => resample_direction(&from, &to),
        None if index.len() <= 1 => ResampleDirection::Downsample,
        None => {
            return Err(ChronoError::IncompatibleFrequency(
                "cannot infer the frequency of the series".into(),
            ));
        }
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(?direction, to = %to, "resample direction");

    let grid = Grid {
        source: index,
        freq: &to,
    };
    let out = match direction {
        ResampleDirection::NoOp => Resampled {
            index: index.clone(),
            values: values.to_vec(),
        },
        ResampleDirection::Downsample => downsample(&grid, values, down)?,
        ResampleDirection::Upsample => upsample(&grid, values, up)?,
    };

    match target {
        ResampleTarget::Freq(_) => Ok(out),
        ResampleTarget::Index(points) => align(out, points),
    }
}

fn align(res: Resampled, target: &TimeIndex) -> Result<Resampled, ChronoError> {
    let positions = res.index.align_to(target)?;
    let values = positions
        .iter()
        .map(|p| p.and_then(|i| res.values.get(i).copied()).unwrap_or(f64::NAN))
        .collect();
    Ok(Resampled {
        index: target.clone(),
        values,
    })
}

fn downsample(
    grid: &Grid<'_>,
    values: &[f64],
    down: &DownStrategy,
) -> Result<Resampled, ChronoError> {
    let keys = grid.keys();
    let mut buckets: BTreeMap<Key, Vec<f64>> = BTreeMap::new();
    for (key, v) in keys.iter().zip(values) {
        let bucket = grid.floor(*key).ok_or_else(overflow)?;
        buckets.entry(bucket).or_default().push(*v);
    }
    let (Some(first), Some(last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Ok(Resampled {
            index: grid.index(&[]),
            values: Vec::new(),
        });
    };
    let last = *last;
    let starts = grid.walk(*first, |k| k <= last)?;

    let aggregate: Box<dyn Fn(&[f64]) -> f64 + '_> = match down {
        DownStrategy::Named(name) => {
            let f = DOWN_STRATEGIES.get(name.as_str()).copied().ok_or_else(|| {
                ChronoError::IncompatibleStrategy(format!("unknown downsample strategy {name:?}"))
            })?;
            Box::new(f)
        }
        DownStrategy::Custom(f) => Box::new(|xs: &[f64]| f(xs)),
    };
    let out = starts
        .iter()
        .map(|k| aggregate(buckets.get(k).map_or(&[][..], Vec::as_slice)))
        .collect();
    Ok(Resampled {
        index: grid.index(&starts),
        values: out,
    })
}

fn upsample(grid: &Grid<'_>, values: &[f64], up: &UpStrategy) -> Result<Resampled, ChronoError> {
    let keys = grid.keys();
    let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
        return Ok(Resampled {
            index: grid.index(&[]),
            values: Vec::new(),
        });
    };

    let points = if grid.source.kind() == IndexKind::Period {
        // Cover every target period inside the source span, up to the end of the
        // last source period.
        let source_freq = grid.source.freq().ok_or_else(|| {
            ChronoError::IncompatibleFrequency("period index without frequency".into())
        })?;
        let Key::Start(last_start) = last else {
            return Err(overflow());
        };
        let end = source_freq.advance(last_start).ok_or_else(overflow)?;
        let start = grid.floor(first).ok_or_else(overflow)?;
        grid.walk(start, |k| matches!(k, Key::Start(p) if p < end))?
    } else {
        if grid.floor(first) != Some(first) {
            return Err(ChronoError::IncompatibleFrequency(format!(
                "first point {} is not on the {} grid",
                grid.source.label(0).unwrap_or_default(),
                grid.freq
            )));
        }
        grid.walk(first, |k| k <= last)?
    };

    let position: BTreeMap<Key, usize> = points.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let mut anchor = vec![false; points.len()];
    let mut grid_values = vec![f64::NAN; points.len()];
    for (i, (key, v)) in keys.iter().zip(values).enumerate() {
        let Some(&pos) = position.get(key) else {
            return Err(ChronoError::IncompatibleFrequency(format!(
                "point {} does not fall on the {} grid",
                grid.source.label(i).unwrap_or_default(),
                grid.freq
            )));
        };
        anchor[pos] = true;
        grid_values[pos] = *v;
    }
    let new_index = grid.index(&points);

    let filled = match up {
        UpStrategy::Named(name) => {
            let kernel = UP_STRATEGIES.get(name.as_str()).copied().ok_or_else(|| {
                ChronoError::IncompatibleStrategy(format!("unknown upsample strategy {name:?}"))
            })?;
            match kernel {
                UpKernel::Forward => propagate(&grid_values, &anchor, false),
                UpKernel::Backward => propagate(&grid_values, &anchor, true),
                UpKernel::Linear => interpolate_between(&grid_values, &anchor),
            }
        }
        UpStrategy::Scalar(s) => {
            let fill = s.to_f64().ok_or_else(|| {
                ChronoError::TypeMismatch(format!("upsample fill {s:?} is not numeric"))
            })?;
            fill_new_points(&grid_values, &anchor, |_| fill)
        }
        UpStrategy::Keyed(map) => fill_new_points(&grid_values, &anchor, |i| {
            new_index
                .label(i)
                .and_then(|l| map.get(&l))
                .and_then(crate::Scalar::to_f64)
                .unwrap_or(f64::NAN)
        }),
        UpStrategy::Custom(f) => {
            let out = f(grid.source, values, &new_index);
            if out.len() != points.len() {
                return Err(ChronoError::IncompatibleStrategy(format!(
                    "upsample function returned {} values for {} grid points",
                    out.len(),
                    points.len()
                )));
            }
            out
        }
    };
    Ok(Resampled {
        index: new_index,
        values: filled,
    })
}

/// Copy the nearest anchor value into each non-anchor slot, looking backward
/// (`reverse == false`) or forward.
fn propagate(values: &[f64], anchor: &[bool], reverse: bool) -> Vec<f64> {
    let mut out = values.to_vec();
    let mut carry = f64::NAN;
    let order: Box<dyn Iterator<Item = usize>> = if reverse {
        Box::new((0..values.len()).rev())
    } else {
        Box::new(0..values.len())
    };
    for i in order {
        if anchor[i] {
            carry = values[i];
        } else {
            out[i] = carry;
        }
    }
    out
}

fn fill_new_points(values: &[f64], anchor: &[bool], fill: impl Fn(usize) -> f64) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| if anchor[i] { *v } else { fill(i) })
        .collect()
}
