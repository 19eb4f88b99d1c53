use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use chronoframe_core::{
    ChronoError, Dtype, FreqUnit, Frequency, IndexKind, InfHandling, NaStrategy, ResampleOptions,
    Scalar, SeriesConfig, Stype, TimeIndex, Timeseries, TransformFn, Transformation, Values,
};
use proptest::prelude::*;

const MONTHS: [&str; 4] = ["2020-01", "2020-02", "2020-03", "2020-04"];

fn monthly_ffill() -> Timeseries {
    Timeseries::builder(vec![1.0, 2.0, f64::NAN, 4.0])
        .labels(MONTHS.to_vec())
        .name("gdp")
        .strat_na("ffill")
        .strat_down("mean")
        .build()
        .unwrap()
}

#[test]
fn monthly_ffill_then_quarterly_mean() {
    let ts = monthly_ffill();
    assert_eq!(ts.index().kind(), IndexKind::Period);
    assert_eq!(ts.freq(), Some(Frequency::month()));
    assert_eq!(ts.series().unwrap().values, vec![1.0, 2.0, 2.0, 4.0]);
    assert!(!ts.has_na());
    assert_eq!(ts.size_na(), 0);

    let q = ts.resample(Frequency::quarter()).unwrap();
    assert_eq!(q.index().labels(), vec!["2020Q1", "2020Q2"]);
    let v = q.series().unwrap().values;
    assert!((v[0] - 5.0 / 3.0).abs() < 1e-12);
    assert_eq!(v[1], 4.0);
    assert_eq!(q.name(), Some("gdp"));
    // the source is untouched
    assert_eq!(ts.size(), 4);
}

#[test]
fn is_na_tracks_raw_positions_only_under_passthrough() {
    let asis = Timeseries::builder(vec![f64::NAN, 1.0, f64::NAN])
        .strat_na("asis")
        .build()
        .unwrap();
    assert_eq!(asis.is_na(), vec![true, false, true]);
    assert_eq!(asis.size_na(), 2);

    let ffill = Timeseries::builder(vec![f64::NAN, 1.0, f64::NAN])
        .strat_na("ffill")
        .build()
        .unwrap();
    assert_eq!(ffill.is_na(), vec![true, false, false]);
    assert_eq!(ffill.is_na_raw(), vec![true, false, true]);
    assert!(ffill.has_na());
}

#[test]
fn infinities_follow_inf_handling() {
    let ts = Timeseries::builder(vec![1.0, f64::INFINITY, 3.0])
        .strat_inf(InfHandling::AsIs)
        .build()
        .unwrap();
    assert!(ts.has_inf());
    assert_eq!(ts.is_inf(), vec![false, true, false]);

    let ts = Timeseries::builder(vec![1.0, f64::NEG_INFINITY, 3.0])
        .strat_na("linear")
        .build()
        .unwrap();
    assert!(!ts.has_inf());
    assert_eq!(ts.series().unwrap().values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn drop_strategy_shrinks_the_index() {
    let ts = Timeseries::builder(vec![1.0, f64::NAN, 3.0])
        .labels(vec!["2021-01-04", "2021-01-05", "2021-01-06"])
        .strat_na("drop")
        .build()
        .unwrap();
    assert_eq!(ts.size(), 2);
    assert_eq!(ts.index().labels(), vec!["2021-01-04", "2021-01-06"]);
    assert_eq!(ts.raw_index().len(), 3);
}

#[test]
fn scalar_and_keyed_fills() {
    let ts = Timeseries::builder(vec![f64::NAN, 2.0])
        .strat_na(NaStrategy::from(-1.0))
        .build()
        .unwrap();
    assert_eq!(ts.series().unwrap().values, vec![-1.0, 2.0]);

    let mut ts = Timeseries::builder(vec![1.0, f64::NAN, f64::NAN, 4.0])
        .labels(MONTHS.to_vec())
        .build()
        .unwrap();
    let keyed: BTreeMap<String, Scalar> = BTreeMap::from([("2020-03".to_string(), 7.0.into())]);
    ts.set_strat_na(keyed).unwrap();
    let v = ts.series().unwrap().values;
    assert!(v[1].is_nan());
    assert_eq!(v[2], 7.0);
}

#[test]
fn unknown_strategy_names_are_rejected() {
    let err = Timeseries::builder(vec![1.0]).strat_na("nearest").build().unwrap_err();
    assert!(matches!(err, ChronoError::IncompatibleStrategy(_)));
    let mut ts = Timeseries::from_values(vec![1.0]).unwrap();
    assert!(matches!(
        ts.set_strat_down("mode"),
        Err(ChronoError::IncompatibleStrategy(_))
    ));
    assert!(matches!(
        ts.set_strat_up("mean"),
        Err(ChronoError::IncompatibleStrategy(_))
    ));
}

#[test]
fn integer_labels_cannot_be_coerced() {
    let err = Timeseries::builder(vec![1.0, 2.0])
        .labels(chronoframe_core::IndexLabels::Integers(vec![0, 1]))
        .build()
        .unwrap_err();
    assert!(matches!(err, ChronoError::IncoercibleIndex(_)));
}

#[test]
fn series_applies_transform_on_every_read() {
    let mut ts = Timeseries::from_values(vec![1.0, 10.0]).unwrap();
    assert_eq!(ts.series().unwrap().values, vec![1.0, 10.0]);
    ts.transform_mut().add(TransformFn::log10());
    assert_eq!(ts.series().unwrap().values, vec![0.0, 1.0]);
    ts.transform_mut().clear();
    assert_eq!(ts.series().unwrap().values, vec![1.0, 10.0]);
    // the baseline never changes
    assert_eq!(ts.values(), &Values::Float(vec![1.0, 10.0]));
}

#[test]
fn resample_uses_transformed_or_original_values() {
    let mut t = Transformation::new();
    t.add(TransformFn::new("x10", |x: &[f64]| x.iter().map(|v| v * 10.0).collect()));
    let ts = Timeseries::builder(vec![1.0, 2.0, 3.0, 4.0])
        .labels(MONTHS.to_vec())
        .strat_down("sum")
        .transform(t)
        .build()
        .unwrap();

    let q = ts.resample(Frequency::quarter()).unwrap();
    assert!(q.transform().is_empty());
    assert_eq!(q.series().unwrap().values, vec![60.0, 40.0]);

    let raw = ts
        .resample_with(Frequency::quarter(), ResampleOptions { use_original: true })
        .unwrap();
    assert_eq!(raw.values(), &Values::Float(vec![6.0, 4.0]));
    assert_eq!(raw.series().unwrap().values, vec![60.0, 40.0]);
}

#[test]
fn resample_onto_an_index_aligns_points() {
    let ts = Timeseries::builder(vec![1.0, 2.0, 3.0, 4.0])
        .labels(MONTHS.to_vec())
        .build()
        .unwrap();
    let target = TimeIndex::period_range(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        3,
        Frequency::quarter(),
    )
    .unwrap();
    let q = ts.resample(&target).unwrap();
    assert_eq!(q.index(), &target);
    let v = q.series().unwrap().values;
    assert_eq!(v[0], 2.0);
    assert_eq!(v[1], 4.0);
    assert!(v[2].is_nan());
}

#[test]
fn upsample_daily_to_hourly_linear() {
    let idx = TimeIndex::duration_range(TimeDelta::days(1), 2).unwrap();
    let ts = Timeseries::new(vec![0.0, 24.0], idx).unwrap();
    let h = ts.resample(Frequency::hour()).unwrap();
    let v = h.series().unwrap().values;
    assert_eq!(v.len(), 25);
    assert_eq!(v[6], 6.0);
    assert_eq!(h.index().kind(), IndexKind::Duration);
}

#[test]
fn direction_follows_nominal_length() {
    let ts = monthly_ffill();
    assert_eq!(
        ts.direction_to(&Frequency::day()).unwrap(),
        chronoframe_core::ResampleDirection::Upsample
    );
    assert_eq!(
        ts.direction_to(&"A".parse().unwrap()).unwrap(),
        chronoframe_core::ResampleDirection::Downsample
    );
    assert_eq!(
        ts.direction_to(&Frequency::new(FreqUnit::Month, 1).unwrap()).unwrap(),
        chronoframe_core::ResampleDirection::NoOp
    );
}

#[test]
fn cast_reinfers_stype() {
    let ts = Timeseries::from_values(vec![0.0, 1.0, 1.0]).unwrap();
    assert_eq!(ts.stype(), Stype::Interval);
    let ints = ts.cast(Dtype::Int).unwrap();
    assert_eq!(ints.dtype(), Dtype::Int);
    assert_eq!(ints.stype(), Stype::Binary);
    let flags = ts.cast(Dtype::Bool).unwrap();
    assert_eq!(flags.stype(), Stype::Binary);

    let text = Timeseries::from_values(vec!["a", "b"]).unwrap();
    assert!(matches!(
        text.cast(Dtype::Float),
        Err(ChronoError::TypeMismatch(_))
    ));
    assert!(matches!(text.series(), Err(ChronoError::TypeMismatch(_))));
}

#[test]
fn cast_to_int_after_infinities_became_missing() {
    let ts = Timeseries::from_values(vec![1.0, f64::INFINITY, 3.0]).unwrap();
    let ints = ts.cast(Dtype::Int).unwrap();
    assert_eq!(ints.values(), &Values::Int(vec![Some(1), None, Some(3)]));
    assert_eq!(ints.raw_values(), &Values::Int(vec![Some(1), None, Some(3)]));

    let kept = Timeseries::builder(vec![1.0, f64::INFINITY])
        .strat_inf(InfHandling::AsIs)
        .build()
        .unwrap();
    assert!(matches!(
        kept.cast(Dtype::Int),
        Err(ChronoError::TypeMismatch(_))
    ));
}

#[test]
fn oversized_frequency_multipliers_are_rejected() {
    assert!(matches!(
        "400000000Y".parse::<Frequency>(),
        Err(ChronoError::IncompatibleFrequency(_))
    ));
    assert!(matches!(
        Frequency::new(FreqUnit::Quarter, u32::MAX),
        Err(ChronoError::IncompatibleFrequency(_))
    ));

    let yearly: Frequency = "1000Y".parse().unwrap();
    let out = monthly_ffill().resample(yearly).unwrap();
    assert_eq!(out.size(), 1);
}

#[test]
fn fractional_second_durations_have_no_grid() {
    assert!(matches!(
        TimeIndex::duration_range(TimeDelta::milliseconds(1500), 4),
        Err(ChronoError::IncoercibleIndex(_))
    ));

    let points = (0..4).map(|i| TimeDelta::milliseconds(1500 * i)).collect();
    let index = TimeIndex::durations(points).unwrap();
    assert_eq!(index.freq(), None);
    let ts = Timeseries::builder(vec![1.0, 2.0, 3.0, 4.0])
        .index(index)
        .build()
        .unwrap();
    assert!(matches!(
        ts.resample(Frequency::second()),
        Err(ChronoError::IncompatibleFrequency(_))
    ));
}

#[test]
fn effective_stype_folds_transform_effects() {
    let mut ts = Timeseries::builder(vec![1.0, 2.0])
        .stype(Stype::Ratio)
        .build()
        .unwrap();
    assert_eq!(ts.effective_stype(), Stype::Ratio);
    ts.transform_mut().add(TransformFn::ln());
    assert_eq!(ts.effective_stype(), Stype::Interval);
    assert_eq!(ts.stype(), Stype::Ratio);
}

#[test]
fn copies_are_independent() {
    let ts = monthly_ffill();
    let mut other = ts.copy();
    other.transform_mut().add(TransformFn::reverse());
    other.set_strat_down("sum").unwrap();
    assert!(ts.transform().is_empty());
    assert_eq!(ts.strat_down().name(), Some("mean"));
}

#[test]
fn config_supplies_default_strategies() {
    let cfg = SeriesConfig {
        strat_na: "bfill".into(),
        default_index_step: std::time::Duration::from_secs(3600),
        ..SeriesConfig::default()
    };
    let ts = Timeseries::builder(vec![f64::NAN, 5.0])
        .config(cfg)
        .build()
        .unwrap();
    assert_eq!(ts.series().unwrap().values, vec![5.0, 5.0]);
    assert_eq!(ts.freq(), Some(Frequency::hour()));
}

proptest! {
    #[test]
    fn construction_keeps_every_point(
        steps in proptest::collection::vec(1i64..10_000, 0..100),
        seed in -1.0e3f64..1.0e3,
    ) {
        let mut offsets = Vec::with_capacity(steps.len());
        let mut acc = 0i64;
        for s in &steps {
            acc += s;
            offsets.push(TimeDelta::seconds(acc));
        }
        let values: Vec<f64> = (0..offsets.len()).map(|i| seed + i as f64).collect();
        let index = TimeIndex::durations(offsets).unwrap();
        let ts = Timeseries::new(values.clone(), index).unwrap();
        prop_assert_eq!(ts.size(), values.len());
    }
}
