use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::America::New_York;
use chronoframe_core::{
    ChronoError, FreqUnit, Frequency, HolidayCalendar, IndexKind, IndexLabels, TimeIndex,
    Timeseries,
};

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct NewYearOnly;

impl HolidayCalendar for NewYearOnly {
    fn name(&self) -> &str {
        "NEWYEAR"
    }

    fn holidays(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, ChronoError> {
        Ok((start.year()..=end.year())
            .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .filter(|d| (start..=end).contains(d))
            .collect())
    }
}

#[test]
fn text_labels_become_periods_or_timestamps() {
    let quarters = TimeIndex::coerce(vec!["2020Q1", "2020Q2", "2020Q4"].into(), None).unwrap();
    assert_eq!(quarters.kind(), IndexKind::Period);
    assert_eq!(quarters.freq(), Some(&Frequency::quarter()));
    assert_eq!(quarters.labels(), vec!["2020Q1", "2020Q2", "2020Q4"]);

    let years = TimeIndex::coerce(vec!["1999", "2000"].into(), None).unwrap();
    assert_eq!(years.freq().map(Frequency::unit), Some(FreqUnit::Year));

    let stamps = TimeIndex::coerce(
        vec!["2020-01-01T09:30:00Z", "2020-01-01 10:30:00"].into(),
        None,
    )
    .unwrap();
    assert_eq!(stamps.kind(), IndexKind::Timestamp);
    assert_eq!(stamps.labels(), vec!["2020-01-01T09:30:00", "2020-01-01T10:30:00"]);
}

#[test]
fn unusable_labels_are_incoercible() {
    for labels in [
        IndexLabels::from(vec!["2020-01", "2020-01-02"]),
        IndexLabels::from(vec!["not a date"]),
        IndexLabels::from(vec!["2020Q5"]),
        IndexLabels::Integers(vec![1, 2, 3]),
    ] {
        assert!(
            matches!(
                TimeIndex::coerce(labels.clone(), None),
                Err(ChronoError::IncoercibleIndex(_))
            ),
            "{labels:?}"
        );
    }
}

#[test]
fn duplicates_violate_integrity() {
    let err = TimeIndex::coerce(vec!["2020-01", "2020-01"].into(), None).unwrap_err();
    assert!(matches!(err, ChronoError::IndexIntegrity(_)));
    let err = TimeIndex::timestamps(vec![utc(2020, 1, 2, 0), utc(2020, 1, 1, 0)]).unwrap_err();
    assert!(matches!(err, ChronoError::IndexIntegrity(_)));
}

#[test]
fn declared_frequency_must_match_period_starts() {
    let months = TimeIndex::coerce(vec!["2020-01", "2020-02"].into(), None).unwrap();
    assert!(matches!(
        months.with_freq(Frequency::quarter()),
        Err(ChronoError::IncompatibleFrequency(_))
    ));
}

#[test]
fn weekday_dates_infer_business_days() {
    let dates = vec![
        date(2024, 1, 4),
        date(2024, 1, 5),
        date(2024, 1, 8),
        date(2024, 1, 9),
    ];
    let index = TimeIndex::coerce(dates.into(), None).unwrap();
    assert_eq!(index.effective_freq(), Some(Frequency::business_day()));
}

#[test]
fn first_of_month_stamps_infer_calendar_steps() {
    let stamps = vec![utc(2020, 1, 1, 0), utc(2020, 4, 1, 0), utc(2020, 7, 1, 0)];
    let index = TimeIndex::timestamps(stamps).unwrap();
    assert_eq!(index.effective_freq(), Some(Frequency::quarter()));
}

#[test]
fn daily_buckets_follow_the_index_zone() {
    // 22:00 on Jan 1 and 01:00 on Jan 2 in New York
    let index = TimeIndex::timestamps(vec![utc(2020, 1, 2, 3), utc(2020, 1, 2, 6)])
        .unwrap()
        .with_tz(New_York)
        .unwrap();
    let ts = Timeseries::builder(vec![1.0, 2.0])
        .index(index)
        .strat_down("sum")
        .build()
        .unwrap();
    let daily = ts.resample(Frequency::day()).unwrap();
    assert_eq!(daily.index().labels(), vec!["2020-01-01", "2020-01-02"]);
    assert_eq!(daily.index().tz(), Some(New_York));
    assert_eq!(daily.series().unwrap().values, vec![1.0, 2.0]);
}

#[test]
fn time_zones_only_attach_to_timestamps() {
    let index = TimeIndex::duration_range(TimeDelta::hours(1), 3).unwrap();
    assert!(matches!(
        index.with_tz(New_York),
        Err(ChronoError::TypeMismatch(_))
    ));
}

#[test]
fn trading_frequency_skips_weekends_and_holidays() {
    let freq = Frequency::trading(&NewYearOnly, date(2023, 1, 1), date(2025, 12, 31)).unwrap();
    assert_eq!(freq.to_string(), "C(NEWYEAR)");
    let index =
        TimeIndex::date_range(utc(2023, 12, 29, 0), 6, Frequency::day()).unwrap();
    let ts = Timeseries::builder(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .index(index)
        .strat_down("sum")
        .build()
        .unwrap();
    let sessions = ts.resample(freq).unwrap();
    assert_eq!(
        sessions.index().labels(),
        vec!["2023-12-29", "2024-01-02", "2024-01-03"]
    );
    assert_eq!(sessions.series().unwrap().values, vec![10.0, 5.0, 6.0]);
}

#[test]
fn durations_align_only_with_durations() {
    let d = TimeIndex::duration_range(TimeDelta::days(1), 3).unwrap();
    let p = TimeIndex::period_range(date(2020, 1, 1), 3, Frequency::day()).unwrap();
    assert!(!d.is_alignable_with(&p));
    assert!(matches!(
        d.align_to(&p),
        Err(ChronoError::IncompatibleFrequency(_))
    ));

    let stamps = TimeIndex::date_range(utc(2020, 1, 2, 0), 2, Frequency::day()).unwrap();
    assert_eq!(stamps.align_to(&p).unwrap(), vec![None, Some(0), Some(1)]);
}
