use scanwatch_core::config::ClientConfig;
use scanwatch_core::view::{occurrence_count, project};

use crate::cli::SortArg;
use crate::commands::common::{format_scan_lines, load_engine, scan_to_list_item, ScanListItem};
use crate::error::CliError;

pub async fn run_list(
    config: &ClientConfig,
    filter: &str,
    sort: SortArg,
    limit: Option<usize>,
    as_json: bool,
) -> Result<(), CliError> {
    let engine = load_engine(config).await?;
    let cache = engine.cache();

    let mut records = project(cache, filter, sort.into());
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if as_json {
        let json_items = records
            .iter()
            .map(|record| scan_to_list_item(record, occurrence_count(cache, &record.data)))
            .collect::<Vec<ScanListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if records.is_empty() {
        println!("No scans");
    } else {
        for line in format_scan_lines(&records, cache) {
            println!("{line}");
        }
    }

    Ok(())
}
