use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use scanwatch_core::api::{HourlyStats, HttpScanApi};
use scanwatch_core::cache::LocalCache;
use scanwatch_core::config::{ClientConfig, SERVER_URL_ENV};
use scanwatch_core::gate::ConfirmationGate;
use scanwatch_core::sync::{Session, SyncEngine};
use scanwatch_core::{ScanId, ScanRecord};
use serde::Serialize;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Serialize)]
pub struct ScanListItem {
    pub id: i64,
    pub data: String,
    #[serde(rename = "type")]
    pub code_type: String,
    pub product_name: Option<String>,
    pub display_name: String,
    pub timestamp: String,
    pub scan_count: Option<u32>,
    pub occurrences: usize,
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("scanwatch").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match explicit {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

/// Effective config: `--server`, then `SCANWATCH_SERVER_URL`, then the file.
pub fn load_config(path: &Path, server: Option<&str>) -> Result<ClientConfig, CliError> {
    load_config_with_env(path, server, env::var(SERVER_URL_ENV).ok())
}

pub fn load_config_with_env(
    path: &Path,
    server: Option<&str>,
    env_server: Option<String>,
) -> Result<ClientConfig, CliError> {
    let config = ClientConfig::load_from_path(path)?
        .with_server_override(server.map(ToString::to_string), env_server)?;
    Ok(config)
}

pub fn open_engine(config: &ClientConfig) -> Result<SyncEngine<HttpScanApi>, CliError> {
    let api = HttpScanApi::new(config.server_url.clone(), config.request_timeout())?;
    let session = Session::new(ConfirmationGate::new(config.confirm_cooldown()));
    Ok(SyncEngine::new(api, session))
}

/// Open an engine and pull the full history into its cache.
pub async fn load_engine(config: &ClientConfig) -> Result<SyncEngine<HttpScanApi>, CliError> {
    let mut engine = open_engine(config)?;
    engine.load().await?;
    Ok(engine)
}

pub fn parse_scan_id(raw: &str) -> Result<ScanId, CliError> {
    let trimmed = raw.trim().trim_start_matches('#');
    if trimmed.is_empty() {
        return Err(CliError::EmptyScanId);
    }
    trimmed
        .parse::<ScanId>()
        .map_err(|_| CliError::InvalidScanId(raw.trim().to_string()))
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn truncate_text(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_scan_line(record: &ScanRecord, occurrences: usize) -> String {
    let id = format!("#{}", record.id);
    let name = truncate_text(record.display_name(), 32);
    let data = truncate_text(&record.data, 24);
    let timestamp = format_timestamp(record.timestamp);

    if occurrences > 1 {
        format!("{id:>7}  {name:<32}  {data:<24}  {timestamp}  [{occurrences}x]")
    } else {
        format!("{id:>7}  {name:<32}  {data:<24}  {timestamp}")
    }
}

pub fn format_scan_lines(records: &[&ScanRecord], cache: &LocalCache) -> Vec<String> {
    records
        .iter()
        .map(|record| format_scan_line(record, cache.occurrence_count(&record.data)))
        .collect()
}

pub fn scan_to_list_item(record: &ScanRecord, occurrences: usize) -> ScanListItem {
    ScanListItem {
        id: record.id.get(),
        data: record.data.clone(),
        code_type: record.code_type.clone(),
        product_name: record.product_name.clone(),
        display_name: record.display_name().to_string(),
        timestamp: record.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        scan_count: record.scan_count,
        occurrences,
    }
}

/// One text bar per hourly bucket, scaled so the busiest hour is `width` wide.
pub fn render_histogram(stats: &HourlyStats, width: usize) -> Vec<String> {
    let peak = stats.peak() as usize;
    stats
        .buckets()
        .map(|(label, count)| {
            let count = count as usize;
            let bar_len = if peak == 0 || count == 0 {
                0
            } else {
                (count * width / peak).max(1)
            };
            format!("{label:>5} {:<width$} {count}", "#".repeat(bar_len))
        })
        .collect()
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question on stderr; anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}
