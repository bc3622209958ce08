use scanwatch_core::api::HourlyStats;
use scanwatch_core::config::ClientConfig;
use scanwatch_core::view::{stats_now, ScanStats};
use serde::Serialize;

use crate::commands::common::{load_engine, render_histogram};
use crate::error::CliError;

const CHART_WIDTH: usize = 40;

#[derive(Debug, Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    counters: ScanStats,
    hourly: HourlyStats,
}

pub async fn run_stats(config: &ClientConfig, as_json: bool) -> Result<(), CliError> {
    let engine = load_engine(config).await?;
    let counters = stats_now(engine.cache());
    let hourly = engine.hourly_stats().await?;

    if as_json {
        let output = StatsOutput { counters, hourly };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Total scans: {}", counters.total);
    println!("Today:       {}", counters.today);
    println!();
    println!("Scans per hour (peak {})", hourly.peak());
    for line in render_histogram(&hourly, CHART_WIDTH) {
        println!("{line}");
    }

    Ok(())
}
