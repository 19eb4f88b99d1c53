use chrono::NaiveDate;
use chronoframe::{Frequency, SeriesFrame, TableSource};
use chronoframe_mock::{FixedHolidays, MockTableSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("bad date")?;
    let sessions = Frequency::trading(&FixedHolidays::nyse_2024(), start, end)?;
    println!("Session frequency: {sessions}");

    // The table has gaps on weekends and holidays; declare the session grid.
    let table = MockTableSource::new().load("prices_daily")?.with_freq(sessions);
    let mut frame = SeriesFrame::from_table(table)?;
    frame.set_strat_down("volume", "sum")?;

    let close = frame.get("close")?;
    println!("close -> W is a {:?}", close.direction_to(&Frequency::week())?);

    // Weekly bars from the session grid.
    let weekly = frame.resample(Some(Frequency::week().into()), vec!["close", "volume"])?;
    for (name, ts) in weekly.iter() {
        let series = ts.series()?;
        println!(" - {name}:");
        for (label, v) in series.index.labels().iter().zip(&series.values) {
            println!("     {label}: {v:.1}");
        }
    }

    Ok(())
}
