use chrono::TimeDelta;
use chronoframe::{ChronoError, Frequency, SeriesFrame, TimeIndex, Timeseries, Which};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let index = TimeIndex::coerce(vec!["2021-01", "2021-02", "2021-03", "2021-04"].into(), None)?;
    let notes = Timeseries::builder(vec!["calm", "calm", "storm", "calm"])
        .index(index.clone())
        .build()?;
    let elapsed = Timeseries::new(
        vec![0.0, 1.5, 3.0, 4.5],
        TimeIndex::duration_range(TimeDelta::hours(6), 4)?,
    )?;

    let frame = SeriesFrame::builder()
        .strict_members(false)
        .index(index)
        .series("rainfall", vec![12.0, 8.5, 40.2, 10.1])
        .series("notes", notes)
        .series("elapsed", elapsed)
        .build()?;

    // Every member is attempted; failures come back together.
    match frame.resample(Some(Frequency::quarter().into()), Which::All) {
        Ok(_) => println!("all members resampled"),
        Err(ChronoError::MembersFailed(failures)) => {
            println!("{} member(s) failed:", failures.len());
            for f in &failures {
                println!(" - {}: {}", f.member, f.error);
            }
        }
        Err(e) => return Err(e.into()),
    }

    // Narrow the selection to the numeric member.
    let rainfall = frame.resample(Some(Frequency::quarter().into()), "rainfall")?;
    let series = rainfall.get("rainfall")?.series()?;
    println!("\nrainfall by quarter: {:?}", series.values);

    Ok(())
}
