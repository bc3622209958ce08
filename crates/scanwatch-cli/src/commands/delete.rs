use scanwatch_core::cache::LocalCache;
use scanwatch_core::config::ClientConfig;
use scanwatch_core::{ScanId, ScanRecord};

use crate::commands::common::{confirm, format_scan_line, load_engine, parse_scan_id};
use crate::error::CliError;

/// Unlike the engine, the command refuses ids missing from the loaded
/// history instead of treating them as already deleted, so typos are reported.
pub async fn run_delete(config: &ClientConfig, id: &str, yes: bool) -> Result<(), CliError> {
    let id = parse_scan_id(id)?;
    let mut engine = load_engine(config).await?;

    let line = format_scan_line(cached_scan(engine.cache(), id)?, 1);
    if !yes && !confirm(&format!("Delete scan {}?", line.trim()))? {
        return Err(CliError::Aborted);
    }

    engine.delete(id).await?;
    println!("{id}");
    Ok(())
}

pub fn cached_scan(cache: &LocalCache, id: ScanId) -> Result<&ScanRecord, CliError> {
    cache
        .get(id)
        .ok_or_else(|| CliError::ScanNotFound(id.to_string()))
}
