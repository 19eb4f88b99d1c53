use chrono::{NaiveDate, TimeDelta};
use chronoframe::{
    ChronoError, Frequency, ResampleOptions, SeriesFrame, TimeIndex, Timeseries, Which,
};

fn monthly(n: usize) -> TimeIndex {
    TimeIndex::period_range(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), n, Frequency::month())
        .unwrap()
}

fn macro_frame() -> SeriesFrame {
    let gdp = Timeseries::builder(vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0])
        .index(monthly(6))
        .strat_na("ffill")
        .build()
        .unwrap();
    let claims = Timeseries::builder(vec![3.0, 1.0, 2.0, 2.0, 2.0, 5.0])
        .index(monthly(6))
        .strat_down("sum")
        .build()
        .unwrap();
    SeriesFrame::builder()
        .name_index("month")
        .series("gdp", gdp)
        .series("claims", claims)
        .build()
        .unwrap()
}

#[test]
fn members_keep_their_own_strategies() {
    let q = macro_frame()
        .resample(Some(Frequency::quarter().into()), Which::All)
        .unwrap();
    assert_eq!(q.index().labels(), vec!["2020Q1", "2020Q2"]);
    assert_eq!(q.name_index(), Some("month"));

    let gdp = q.get("gdp").unwrap().series().unwrap().values;
    assert!((gdp[0] - 5.0 / 3.0).abs() < 1e-12);
    assert!((gdp[1] - 5.0).abs() < 1e-12);
    assert_eq!(q.get("claims").unwrap().series().unwrap().values, vec![6.0, 9.0]);
}

#[test]
fn original_frame_is_untouched() {
    let f = macro_frame();
    let before = f.copy();
    let _ = f
        .resample(Some(Frequency::quarter().into()), "gdp")
        .unwrap();
    assert_eq!(f.index(), before.index());
    for ((a, x), (b, y)) in f.iter().zip(before.iter()) {
        assert_eq!(a, b);
        assert_eq!(x.size(), y.size());
        assert_eq!(x.freq(), y.freq());
    }
}

#[test]
fn failures_are_collected_in_member_order() {
    let text = Timeseries::builder(vec!["a", "b", "c"])
        .index(monthly(3))
        .build()
        .unwrap();
    let offsets = Timeseries::from_values(vec![1.0, 2.0, 3.0]).unwrap();
    let f = SeriesFrame::builder()
        .strict_members(false)
        .index(monthly(3))
        .series("level", vec![1.0, 2.0, 3.0])
        .series("notes", text)
        .series("offsets", offsets)
        .build()
        .unwrap();

    let err = f
        .resample(Some(Frequency::quarter().into()), Which::All)
        .unwrap_err();
    assert!(matches!(err, ChronoError::MembersFailed(_)));
    assert_eq!(err.failed_members(), vec!["notes", "offsets"]);
    let ChronoError::MembersFailed(failures) = err else {
        unreachable!();
    };
    assert!(matches!(failures[0].error, ChronoError::TypeMismatch(_)));
    assert!(matches!(
        failures[1].error,
        ChronoError::IncompatibleFrequency(_)
    ));

    let ok = f
        .resample(Some(Frequency::quarter().into()), "level")
        .unwrap();
    assert_eq!(ok.get("level").unwrap().size(), 1);
    assert_eq!(ok.get("notes").unwrap().size(), 3);
}

#[test]
fn no_target_means_the_primary_index() {
    let hourly = TimeIndex::duration_range(TimeDelta::hours(1), 5).unwrap();
    let two_hourly = TimeIndex::duration_range(TimeDelta::hours(2), 3).unwrap();
    let coarse = Timeseries::new(vec![0.0, 2.0, 4.0], two_hourly).unwrap();
    let f = SeriesFrame::builder()
        .index(hourly.clone())
        .series("coarse", coarse)
        .build()
        .unwrap();
    let out = f.resample(None, Which::All).unwrap();
    assert_eq!(out.index(), &hourly);
    let coarse = out.get("coarse").unwrap();
    assert_eq!(coarse.size(), 5);
    assert_eq!(coarse.series().unwrap().values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn index_targets_become_the_primary_index() {
    let f = macro_frame();
    let target = TimeIndex::period_range(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        3,
        Frequency::quarter(),
    )
    .unwrap();
    let out = f
        .resample(Some(target.clone().into()), vec!["gdp", "claims"])
        .unwrap();
    assert_eq!(out.index().labels(), target.labels());
    let claims = out.get("claims").unwrap().series().unwrap().values;
    assert_eq!(claims.len(), 3);
    assert_eq!(&claims[..2], &[6.0, 9.0]);
    assert!(claims[2].is_nan());
}

#[test]
fn use_original_skips_cleaning_and_keeps_transforms() {
    let mut f = macro_frame();
    f.access_transform("claims").unwrap().add_named("ln").unwrap();
    let out = f
        .resample_with(
            Some(Frequency::quarter().into()),
            "claims",
            ResampleOptions { use_original: true },
        )
        .unwrap();
    let claims = out.get("claims").unwrap();
    assert_eq!(claims.transform().size(), 1);
    let values = claims.series().unwrap().values;
    assert!((values[0] - 6.0_f64.ln()).abs() < 1e-12);
}
