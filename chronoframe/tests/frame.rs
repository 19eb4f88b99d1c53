use chrono::{NaiveDate, TimeDelta};
use chronoframe::{
    ChronoError, FrameConfig, Frequency, IndexKind, SeriesFrame, TimeIndex, Timeseries, Values,
};
use proptest::prelude::*;

fn monthly(n: usize) -> TimeIndex {
    TimeIndex::period_range(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), n, Frequency::month())
        .unwrap()
}

fn frame() -> SeriesFrame {
    SeriesFrame::builder()
        .index(monthly(4))
        .name_index("month")
        .series("gdp", vec![1.0, f64::NAN, 3.0, 4.0])
        .series("cpi", vec![10.0, 11.0, 12.0, 13.0])
        .build()
        .unwrap()
}

#[test]
fn member_names_follow_the_identifier_rule() {
    let err = SeriesFrame::builder()
        .index(monthly(2))
        .series("1bad", vec![1.0, 2.0])
        .build()
        .unwrap_err();
    assert_eq!(err, ChronoError::invalid_identifier("1bad"));

    let ok = SeriesFrame::builder()
        .index(monthly(2))
        .series("bad_1", vec![1.0, 2.0])
        .build()
        .unwrap();
    assert_eq!(ok.names(), vec!["bad_1"]);

    let mut f = frame();
    assert!(matches!(
        f.add("with space", vec![0.0; 4]),
        Err(ChronoError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        f.rename("gdp", "gdp-real"),
        Err(ChronoError::InvalidIdentifier { .. })
    ));
}

#[test]
fn access_series_edits_the_stored_member() {
    let mut f = frame();
    f.access_series("gdp").unwrap().set_strat_na("ffill").unwrap();
    let gdp = f.get("gdp").unwrap();
    assert_eq!(gdp.strat_na().name(), Some("ffill"));
    assert_eq!(gdp.series().unwrap().values, vec![1.0, 1.0, 3.0, 4.0]);
    assert_eq!(f.access_strat_na("gdp").unwrap().name(), Some("ffill"));
}

#[test]
fn access_transform_edits_the_stored_member() {
    let mut f = frame();
    f.access_transform("cpi").unwrap().add_named("ln").unwrap();
    let values = f.get("cpi").unwrap().series().unwrap().values;
    assert!((values[0] - 10.0_f64.ln()).abs() < 1e-12);
    assert_eq!(f.get("cpi").unwrap().raw_values(), &Values::from(vec![10.0, 11.0, 12.0, 13.0]));
}

#[test]
fn removed_members_are_gone() {
    let mut f = frame();
    let gdp = f.remove("gdp").unwrap();
    assert_eq!(gdp.name(), Some("gdp"));
    assert_eq!(f.get("gdp").unwrap_err(), ChronoError::key_not_found("gdp"));
    assert_eq!(f.drop("gdp").unwrap_err(), ChronoError::key_not_found("gdp"));
    assert_eq!(f.names(), vec!["cpi"]);
    f.add_named(gdp).unwrap();
    assert_eq!(f.names(), vec!["cpi", "gdp"]);
}

#[test]
fn primary_index_is_replaceable_when_alignable() {
    let mut f = frame();
    f.set_index(monthly(6)).unwrap();
    assert_eq!(f.index().len(), 6);
    assert_eq!(f.name_index(), Some("month"));

    let durations = TimeIndex::duration_range(TimeDelta::days(1), 4).unwrap();
    assert!(matches!(
        f.set_index(durations.clone()),
        Err(ChronoError::TypeMismatch(_))
    ));

    let mut loose = SeriesFrame::builder()
        .strict_members(false)
        .index(monthly(4))
        .series("x", vec![1.0, 2.0, 3.0, 4.0])
        .build()
        .unwrap();
    loose.set_index(durations).unwrap();
    assert_eq!(loose.index().kind(), IndexKind::Duration);
}

#[test]
fn strict_frames_reject_unalignable_members() {
    let mut f = frame();
    let elsewhere = Timeseries::from_values(vec![1.0, 2.0]).unwrap();
    assert!(matches!(
        f.add("elsewhere", elsewhere.clone()),
        Err(ChronoError::TypeMismatch(_))
    ));
    assert_eq!(f.size(), 2);

    let loose_cfg = FrameConfig {
        strict_members: false,
        ..FrameConfig::default()
    };
    let mut loose = SeriesFrame::builder()
        .config(loose_cfg)
        .index(monthly(1))
        .build()
        .unwrap();
    loose.add("elsewhere", elsewhere).unwrap();
    assert_eq!(loose.get("elsewhere").unwrap().name(), Some("elsewhere"));
}

#[test]
fn bare_values_need_somewhere_to_live() {
    let err = SeriesFrame::builder()
        .series("x", vec![1.0, 2.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ChronoError::TypeMismatch(_)));

    let empty = SeriesFrame::builder().build().unwrap();
    assert!(empty.is_empty());
    assert!(empty.index().is_empty());
}

#[test]
fn primary_index_defaults_to_the_longest_member() {
    let short = Timeseries::builder(vec![1.0, 2.0])
        .labels(vec!["2020-01", "2020-02"])
        .build()
        .unwrap();
    let long = Timeseries::builder(vec![1.0, 2.0, 3.0])
        .labels(vec!["2020-03", "2020-04", "2020-05"])
        .build()
        .unwrap();
    let f = SeriesFrame::from_series([("short", short), ("long", long)]).unwrap();
    assert_eq!(f.index().labels(), vec!["2020-03", "2020-04", "2020-05"]);
    assert_eq!(f.freq(), Some(Frequency::month()));
}

#[test]
fn to_table_aligns_members_onto_the_primary_index() {
    let mut f = frame();
    let middle = Timeseries::builder(vec![7.0, 8.0])
        .labels(vec!["2020-02", "2020-03"])
        .build()
        .unwrap();
    f.add("middle", middle).unwrap();

    let table = f.to_table().unwrap();
    assert_eq!(table.height(), 4);
    assert_eq!(table.width(), 3);
    assert_eq!(table.freq, Some(Frequency::month()));
    let Some(Values::Float(middle)) = table.column("middle") else {
        panic!("middle column should be float");
    };
    assert!(middle[0].is_nan());
    assert_eq!(&middle[1..3], &[7.0, 8.0]);
    assert!(middle[3].is_nan());

    let round_trip = SeriesFrame::from_table(table).unwrap();
    assert_eq!(round_trip.names(), vec!["gdp", "cpi", "middle"]);
    assert_eq!(round_trip.index().labels(), f.index().labels());
}

#[test]
fn from_values_uses_a_default_index() {
    let f = SeriesFrame::from_values("level", vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(f.index().kind(), IndexKind::Duration);
    assert_eq!(f.freq(), Some(Frequency::day()));
    assert!(SeriesFrame::from_values("", vec![1.0]).is_err());
}

proptest! {
    #[test]
    fn names_stay_unique_under_random_edits(ops in proptest::collection::vec((0u8..3, 0usize..4), 0..40)) {
        let pool = ["a", "b", "c", "d"];
        let mut f = SeriesFrame::builder().index(monthly(2)).build().unwrap();
        for (op, k) in ops {
            let name = pool[k];
            let _ = match op {
                0 => f.add(name, vec![1.0, 2.0]),
                1 => f.remove(name).map(|_| ()),
                _ => f.rename(name, pool[(k + 1) % pool.len()]),
            };
            let mut names = f.names();
            let n = names.len();
            names.sort_unstable();
            names.dedup();
            prop_assert_eq!(names.len(), n);
            prop_assert_eq!(f.size(), n);
            for (name, ts) in f.iter() {
                prop_assert_eq!(ts.name(), Some(name));
            }
        }
    }
}
