use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use chronoframe_core::{Frequency, IndexLabels, Table, Values};

pub const KEYS: &[&str] = &["macro_monthly", "prices_daily", "sensor_hourly", "survey_quarterly"];

pub fn by_key(key: &str) -> Option<Table> {
    match key {
        "macro_monthly" => Some(macro_monthly()),
        "prices_daily" => Some(prices_daily()),
        "sensor_hourly" => Some(sensor_hourly()),
        "survey_quarterly" => Some(survey_quarterly()),
        _ => None,
    }
}

fn macro_monthly() -> Table {
    let labels: Vec<String> = (1..=12).map(|m| format!("2020-{m:02}")).collect();
    Table::new(IndexLabels::Text(labels))
        .with_column(
            "gdp",
            vec![
                100.0, 100.4, f64::NAN, 101.1, 101.5, f64::NAN, 102.3, 102.8, 103.0, 103.6, 104.1,
                104.5,
            ],
        )
        .with_column(
            "cpi",
            vec![
                257.9, 258.7, 258.1, 256.4, 256.4, 257.8, 259.1, 259.9, 260.3, 260.4, 260.2, 260.5,
            ],
        )
        .with_column(
            "unemployment",
            vec![3.5, 3.5, 4.4, 14.7, 13.2, 11.0, 10.2, 8.4, 7.9, 6.9, 6.7, 6.7],
        )
}

fn prices_daily() -> Table {
    let days: Vec<NaiveDate> = [2, 3, 4, 5, 8, 9, 10, 11, 12, 16, 17, 18, 19]
        .into_iter()
        .filter_map(|d| NaiveDate::from_ymd_opt(2024, 1, d))
        .collect();
    Table::new(days)
        .with_column(
            "close",
            vec![
                185.6, 184.3, 181.9, 181.2, 185.6, 185.1, 186.2, 185.6, 185.9, 183.6, 182.7, 188.6,
                191.6,
            ],
        )
        .with_column(
            "volume",
            vec![82_i64, 58, 71, 62, 59, 42, 46, 49, 40, 65, 47, 78, 68],
        )
        .with_column(
            "up_day",
            vec![
                true, false, false, false, true, false, true, false, true, false, false, true, true,
            ],
        )
}

fn sensor_hourly() -> Table {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let stamps: Vec<_> = (0..24).map(|h| start + TimeDelta::hours(h)).collect();
    let reading: Vec<f64> = (0..24_i32)
        .map(|h| match h {
            5 | 6 => f64::NAN,
            17 => f64::INFINITY,
            _ => 20.0 + f64::from(h) * 0.25,
        })
        .collect();
    Table::new(stamps)
        .with_freq(Frequency::hour())
        .with_column("reading", reading)
}

fn survey_quarterly() -> Table {
    Table::new(vec!["2019Q1", "2019Q2", "2019Q3", "2019Q4", "2020Q1", "2020Q2"])
        .with_column("sentiment", vec![98.4, 97.2, 93.2, 99.3, 96.4, 74.1])
        .with_column(
            "region",
            Values::categorical(["north", "south", "north", "east", "south", "north"].map(Some)),
        )
}
