use chrono::NaiveDate;

pub fn nyse_2024() -> Vec<NaiveDate> {
    [
        (1, 1),
        (1, 15),
        (2, 19),
        (3, 29),
        (5, 27),
        (6, 19),
        (7, 4),
        (9, 2),
        (11, 28),
        (12, 25),
    ]
    .into_iter()
    .filter_map(|(m, d)| NaiveDate::from_ymd_opt(2024, m, d))
    .collect()
}
