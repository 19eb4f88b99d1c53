//! A single series with its own cleaning, transformation and resampling rules.

mod clean;
mod resample;
mod series;

use chrono::TimeDelta;

pub use resample::{ResampleOptions, ResampleTarget, resample_direction};
pub use series::Series;

use crate::{
    ChronoError, DownStrategy, Dtype, Frequency, IndexLabels, InfHandling, NaStrategy,
    ResampleDirection, SeriesConfig, Stype, TimeIndex, Transformation, UpStrategy, Values,
};

/// One value column aligned 1:1 with a temporal index.
///
/// The raw values are cleaned once at construction (infinities, then the
/// missing-value strategy) into the stored baseline. The owned
/// [`Transformation`] is applied on every read of [`Timeseries::series`].
/// `cast`, `resample` and `copy` return new instances.
#[derive(Debug, Clone)]
pub struct Timeseries {
    name: Option<String>,
    raw_index: TimeIndex,
    raw_values: Values,
    index: TimeIndex,
    values: Values,
    transform: Transformation,
    strat_na: NaStrategy,
    strat_inf: InfHandling,
    strat_up: UpStrategy,
    strat_down: DownStrategy,
    stype: Stype,
    stype_explicit: bool,
}

/// Builder for [`Timeseries`].
#[derive(Debug, Clone)]
pub struct TimeseriesBuilder {
    values: Values,
    index: Option<TimeIndex>,
    labels: Option<IndexLabels>,
    freq: Option<Frequency>,
    name: Option<String>,
    cfg: SeriesConfig,
    strat_na: Option<NaStrategy>,
    strat_inf: Option<InfHandling>,
    strat_up: Option<UpStrategy>,
    strat_down: Option<DownStrategy>,
    transform: Transformation,
    stype: Option<Stype>,
}

impl TimeseriesBuilder {
    fn new(values: Values) -> Self {
        Self {
            values,
            index: None,
            labels: None,
            freq: None,
            name: None,
            cfg: SeriesConfig::default(),
            strat_na: None,
            strat_inf: None,
            strat_up: None,
            strat_down: None,
            transform: Transformation::new(),
            stype: None,
        }
    }

    /// Use an already validated index.
    #[must_use]
    pub fn index(mut self, index: TimeIndex) -> Self {
        self.index = Some(index);
        self.labels = None;
        self
    }

    /// Coerce loose labels into the index at build time.
    #[must_use]
    pub fn labels(mut self, labels: impl Into<IndexLabels>) -> Self {
        self.labels = Some(labels.into());
        self.index = None;
        self
    }

    /// Declare the index frequency.
    #[must_use]
    pub fn freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    /// Series name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Defaults for any strategy not set explicitly.
    #[must_use]
    pub fn config(mut self, cfg: SeriesConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Missing-value strategy.
    #[must_use]
    pub fn strat_na(mut self, s: impl Into<NaStrategy>) -> Self {
        self.strat_na = Some(s.into());
        self
    }

    /// Infinite-value handling.
    #[must_use]
    pub const fn strat_inf(mut self, h: InfHandling) -> Self {
        self.strat_inf = Some(h);
        self
    }

    /// Upsample strategy.
    #[must_use]
    pub fn strat_up(mut self, s: impl Into<UpStrategy>) -> Self {
        self.strat_up = Some(s.into());
        self
    }

    /// Downsample strategy.
    #[must_use]
    pub fn strat_down(mut self, s: impl Into<DownStrategy>) -> Self {
        self.strat_down = Some(s.into());
        self
    }

    /// Owned transformation.
    #[must_use]
    pub fn transform(mut self, t: Transformation) -> Self {
        self.transform = t;
        self
    }

    /// Override the inferred statistical type.
    #[must_use]
    pub const fn stype(mut self, stype: Stype) -> Self {
        self.stype = Some(stype);
        self
    }

    /// Validate and clean.
    ///
    /// # Errors
    /// `IncoercibleIndex` when labels are not temporal, `IndexIntegrity` when
    /// the index is not strictly increasing or its length differs from the
    /// values, `IncompatibleStrategy` for unknown strategy names or a
    /// strategy that cannot clean these values.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "chronoframe_core::timeseries::build",
            skip(self),
            fields(name = self.name.as_deref().unwrap_or(""), len = self.values.len()),
        )
    )]
    pub fn build(self) -> Result<Timeseries, ChronoError> {
        let index = match (self.index, self.labels) {
            (Some(index), _) => match self.freq {
                Some(f) => index.with_freq(f)?,
                None => index,
            },
            (None, Some(labels)) => TimeIndex::coerce(labels, self.freq)?,
            (None, None) => {
                let step = TimeDelta::from_std(self.cfg.default_index_step).map_err(|_| {
                    ChronoError::TypeMismatch("default index step out of range".into())
                })?;
                TimeIndex::duration_range(step, self.values.len())?
            }
        };
        if index.len() != self.values.len() {
            return Err(ChronoError::IndexIntegrity(format!(
                "index has {} points but there are {} values",
                index.len(),
                self.values.len()
            )));
        }

        let strat_na = self
            .strat_na
            .unwrap_or_else(|| NaStrategy::Named(self.cfg.strat_na.clone()));
        let strat_up = self
            .strat_up
            .unwrap_or_else(|| UpStrategy::Named(self.cfg.strat_up.clone()));
        let strat_down = self
            .strat_down
            .unwrap_or_else(|| DownStrategy::Named(self.cfg.strat_down.clone()));
        strat_na.validate()?;
        strat_up.validate()?;
        strat_down.validate()?;
        let strat_inf = self.strat_inf.unwrap_or(self.cfg.strat_inf);

        let mut ts = Timeseries {
            name: self.name,
            index: index.clone(),
            values: self.values.clone(),
            raw_index: index,
            raw_values: self.values,
            transform: self.transform,
            strat_na,
            strat_inf,
            strat_up,
            strat_down,
            stype: Stype::Interval,
            stype_explicit: false,
        };
        ts.reclean()?;
        if let Some(stype) = self.stype {
            ts.set_stype(stype);
        }
        Ok(ts)
    }
}

impl Timeseries {
    /// Start a builder over `values`.
    pub fn builder(values: impl Into<Values>) -> TimeseriesBuilder {
        TimeseriesBuilder::new(values.into())
    }

    /// Series on `index` with default strategies.
    ///
    /// # Errors
    /// See [`TimeseriesBuilder::build`].
    pub fn new(values: impl Into<Values>, index: TimeIndex) -> Result<Self, ChronoError> {
        Self::builder(values).index(index).build()
    }

    /// Series on a default duration index (`0d, 1d, ...`).
    ///
    /// # Errors
    /// See [`TimeseriesBuilder::build`].
    pub fn from_values(values: impl Into<Values>) -> Result<Self, ChronoError> {
        Self::builder(values).build()
    }

    fn reclean(&mut self) -> Result<(), ChronoError> {
        let (index, values) =
            clean::clean(&self.raw_index, &self.raw_values, self.strat_inf, &self.strat_na)?;
        self.index = index;
        self.values = values;
        if !self.stype_explicit {
            self.stype = self.values.infer_stype();
        }
        Ok(())
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the series.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Index of the cleaned values.
    #[must_use]
    pub const fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Index as supplied at construction.
    #[must_use]
    pub const fn raw_index(&self) -> &TimeIndex {
        &self.raw_index
    }

    /// Cleaned, untransformed values.
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    /// Values as supplied at construction.
    #[must_use]
    pub const fn raw_values(&self) -> &Values {
        &self.raw_values
    }

    /// Storage dtype.
    #[must_use]
    pub const fn dtype(&self) -> Dtype {
        self.values.dtype()
    }

    /// Number of stored points.
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Whether no points are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Frequency of the stored index, declared or inferred.
    #[must_use]
    pub fn freq(&self) -> Option<Frequency> {
        self.index.effective_freq()
    }

    /// The cleaned values with the owned transformation applied.
    ///
    /// Recomputed on every call.
    ///
    /// # Errors
    /// `TypeMismatch` for text values, `LengthMismatch` from the pipeline.
    pub fn series(&self) -> Result<Series, ChronoError> {
        let base = Series::new(self.index.clone(), self.values.to_f64()?);
        self.transform.apply(base)
    }

    /// The owned transformation.
    #[must_use]
    pub const fn transform(&self) -> &Transformation {
        &self.transform
    }

    /// Mutable access to the owned transformation.
    pub fn transform_mut(&mut self) -> &mut Transformation {
        &mut self.transform
    }

    /// Replace the owned transformation.
    pub fn set_transform(&mut self, t: Transformation) {
        self.transform = t;
    }

    /// Missing-value strategy.
    #[must_use]
    pub const fn strat_na(&self) -> &NaStrategy {
        &self.strat_na
    }

    /// Replace the missing-value strategy and re-clean from the raw values.
    ///
    /// # Errors
    /// `IncompatibleStrategy` for an unknown name or a strategy that cannot
    /// clean these values; the series is left unchanged.
    pub fn set_strat_na(&mut self, s: impl Into<NaStrategy>) -> Result<(), ChronoError> {
        let s = s.into();
        s.validate()?;
        let previous = std::mem::replace(&mut self.strat_na, s);
        if let Err(e) = self.reclean() {
            self.strat_na = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Infinite-value handling.
    #[must_use]
    pub const fn strat_inf(&self) -> InfHandling {
        self.strat_inf
    }

    /// Replace the infinite-value handling and re-clean from the raw values.
    ///
    /// # Errors
    /// Propagates cleaning failures; the series is left unchanged.
    pub fn set_strat_inf(&mut self, h: InfHandling) -> Result<(), ChronoError> {
        let previous = std::mem::replace(&mut self.strat_inf, h);
        if let Err(e) = self.reclean() {
            self.strat_inf = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Upsample strategy.
    #[must_use]
    pub const fn strat_up(&self) -> &UpStrategy {
        &self.strat_up
    }

    /// Replace the upsample strategy.
    ///
    /// # Errors
    /// `IncompatibleStrategy` for an unknown name.
    pub fn set_strat_up(&mut self, s: impl Into<UpStrategy>) -> Result<(), ChronoError> {
        let s = s.into();
        s.validate()?;
        self.strat_up = s;
        Ok(())
    }

    /// Downsample strategy.
    #[must_use]
    pub const fn strat_down(&self) -> &DownStrategy {
        &self.strat_down
    }

    /// Replace the downsample strategy.
    ///
    /// # Errors
    /// `IncompatibleStrategy` for an unknown name.
    pub fn set_strat_down(&mut self, s: impl Into<DownStrategy>) -> Result<(), ChronoError> {
        let s = s.into();
        s.validate()?;
        self.strat_down = s;
        Ok(())
    }

    /// Stored statistical type.
    #[must_use]
    pub const fn stype(&self) -> Stype {
        self.stype
    }

    /// Override the statistical type; it is no longer re-inferred.
    pub fn set_stype(&mut self, stype: Stype) {
        self.stype = stype;
        self.stype_explicit = true;
    }

    /// Statistical type of [`Timeseries::series`]: the stored type with the
    /// effects of every transformation step folded in.
    #[must_use]
    pub fn effective_stype(&self) -> Stype {
        self.transform.effect_on(self.stype)
    }

    /// Missing flags. Under the pass-through strategy these are the raw
    /// missing positions; otherwise the positions still missing after
    /// cleaning.
    #[must_use]
    pub fn is_na(&self) -> Vec<bool> {
        if self.strat_na.is_passthrough() {
            self.raw_values.missing_mask()
        } else {
            self.values.missing_mask()
        }
    }

    /// Missing flags of the raw values.
    #[must_use]
    pub fn is_na_raw(&self) -> Vec<bool> {
        self.raw_values.missing_mask()
    }

    /// Whether the cleaned values contain a missing value.
    #[must_use]
    pub fn has_na(&self) -> bool {
        self.size_na() > 0
    }

    /// Number of missing cleaned values.
    #[must_use]
    pub fn size_na(&self) -> usize {
        self.values.missing_mask().iter().filter(|m| **m).count()
    }

    /// Infinity flags of the cleaned values.
    #[must_use]
    pub fn is_inf(&self) -> Vec<bool> {
        self.values.infinite_mask()
    }

    /// Whether the cleaned values contain an infinity.
    #[must_use]
    pub fn has_inf(&self) -> bool {
        self.size_inf() > 0
    }

    /// Number of infinite cleaned values.
    #[must_use]
    pub fn size_inf(&self) -> usize {
        self.values.infinite_mask().iter().filter(|m| **m).count()
    }

    /// Copy with values cast to `dtype` and the statistical type re-inferred.
    ///
    /// Raw values that `dtype` cannot represent become missing; only the
    /// cleaned values decide whether the cast succeeds.
    ///
    /// # Errors
    /// `TypeMismatch` when a cleaned value has no representation in `dtype`.
    pub fn cast(&self, dtype: Dtype) -> Result<Self, ChronoError> {
        let mut out = self.clone();
        out.values = self.values.cast(dtype)?;
        out.raw_values = match (&self.raw_values, dtype) {
            (Values::Float(raw), Dtype::Int) => {
                let representable = raw
                    .iter()
                    .map(|x| {
                        if x.is_finite() && x.abs() < i64::MAX as f64 {
                            *x
                        } else {
                            f64::NAN
                        }
                    })
                    .collect::<Vec<_>>();
                Values::Float(representable).cast(dtype)?
            }
            (raw, _) => raw.cast(dtype)?,
        };
        out.stype = out.values.infer_stype();
        out.stype_explicit = false;
        Ok(out)
    }

    /// Deep copy. Transformation functions are shared, everything else is new.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Classify a resample of this series to `target`.
    ///
    /// # Errors
    /// `IncompatibleFrequency` when the series frequency cannot be inferred.
    pub fn direction_to(&self, target: &Frequency) -> Result<ResampleDirection, ChronoError> {
        self.freq()
            .map(|from| resample_direction(&from, target))
            .ok_or_else(|| {
                ChronoError::IncompatibleFrequency(
                    "cannot infer the frequency of the series".into(),
                )
            })
    }

    /// Resample the transformed series onto `target`.
    ///
    /// Upsampling fills new points with `strat_up`, downsampling aggregates
    /// buckets with `strat_down`. The result is a float series whose baseline
    /// is the resampled values; its transformation is empty because the
    /// transformation is already applied.
    ///
    /// # Errors
    /// See [`Timeseries::resample_with`].
    pub fn resample(&self, target: impl Into<ResampleTarget>) -> Result<Self, ChronoError> {
        self.resample_with(target, ResampleOptions::default())
    }

    /// Resample with options.
    ///
    /// With `use_original` the raw values are resampled instead and the
    /// result keeps this series' transformation.
    ///
    /// # Errors
    /// `IncompatibleFrequency` when the target has no regular step for the
    /// index kind or the series frequency cannot be inferred;
    /// `IncompatibleStrategy` when a strategy cannot produce a result of the
    /// right shape; `TypeMismatch` for text values.
    pub fn resample_with(
        &self,
        target: impl Into<ResampleTarget>,
        opts: ResampleOptions,
    ) -> Result<Self, ChronoError> {
        let target = target.into();
        let (source, transform) = if opts.use_original {
            (
                Series::new(self.raw_index.clone(), self.raw_values.to_f64()?),
                self.transform.clone(),
            )
        } else {
            (self.series()?, Transformation::new())
        };
        let out = resample::resample_values(
            &source.index,
            &source.values,
            &target,
            &self.strat_up,
            &self.strat_down,
        )?;
        let values = Values::Float(out.values);
        let stype = if self.stype_explicit {
            self.stype
        } else {
            values.infer_stype()
        };
        Ok(Self {
            name: self.name.clone(),
            raw_index: out.index.clone(),
            raw_values: values.clone(),
            index: out.index,
            values,
            transform,
            strat_na: self.strat_na.clone(),
            strat_inf: self.strat_inf,
            strat_up: self.strat_up.clone(),
            strat_down: self.strat_down.clone(),
            stype,
            stype_explicit: self.stype_explicit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_index_is_daily_durations() {
        let ts = Timeseries::from_values(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.index().kind(), crate::IndexKind::Duration);
        assert_eq!(ts.freq(), Some(Frequency::day()));
    }

    #[test]
    fn length_mismatch_is_integrity_violation() {
        let idx = TimeIndex::duration_range(TimeDelta::days(1), 2).unwrap();
        assert!(matches!(
            Timeseries::new(vec![1.0, 2.0, 3.0], idx),
            Err(ChronoError::IndexIntegrity(_))
        ));
    }

    #[test]
    fn failed_reclean_keeps_previous_strategy() {
        let mut ts = Timeseries::from_values(vec!["a", "b"]).unwrap();
        assert!(ts.set_strat_na("mean").is_err());
        assert_eq!(ts.strat_na().name(), Some("asis"));
    }

    #[test]
    fn explicit_stype_survives_reclean_but_not_cast() {
        let mut ts = Timeseries::builder(vec![1.0, f64::NAN])
            .stype(Stype::Ratio)
            .build()
            .unwrap();
        ts.set_strat_na("zero").unwrap();
        assert_eq!(ts.stype(), Stype::Ratio);
        let ints = ts.cast(Dtype::Int).unwrap();
        assert_eq!(ints.stype(), Stype::Binary);
    }
}
