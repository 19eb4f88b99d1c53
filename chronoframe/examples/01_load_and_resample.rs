use chronoframe::{FrameConfig, Frequency, SeriesFrame, TableSource, Which};
use chronoframe_mock::MockTableSource;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Load a monthly macro table and split it into members.
    let source = MockTableSource::new();
    println!("Tables in '{}': {:?}", source.name(), source.keys());
    let cfg: FrameConfig = serde_json::from_str(r#"{ "series": { "strat_na": "ffill" } }"#)?;
    let mut frame = SeriesFrame::load(&source, "macro_monthly", cfg)?;
    frame.set_name_index("month");

    // 2. Give each member its own downsample strategy.
    frame.set_strat_down("gdp", "last")?;
    frame.set_strat_down("unemployment", "max")?;

    // 3. Log-transform CPI in place.
    frame.access_transform("cpi")?.add_named("ln")?;

    // 4. Quarterly view of every member.
    let quarterly = frame.resample(Some(Frequency::quarter().into()), Which::All)?;
    println!("\n## Quarterly ({} members)", quarterly.size());
    let table = quarterly.to_table()?;
    let labels = quarterly.index().labels();
    for (name, values) in &table.columns {
        println!(" - {name}:");
        for (label, v) in labels.iter().zip(values.to_f64()?) {
            println!("     {label}: {v:.3}");
        }
    }

    Ok(())
}
