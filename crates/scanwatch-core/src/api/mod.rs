//! Scan server API.
//!
//! `ScanApi` is the narrow seam the sync engine talks through;
//! `HttpScanApi` implements it over the scanner backend's JSON endpoints.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{ScanCandidate, ScanId, ScanRecord};

/// Page size used when pulling the full scan history.
pub const HISTORY_PAGE_SIZE: usize = 100;

const ERROR_BODY_MAX_CHARS: usize = 180;

/// Scans per hour of the current day, as served for the trends chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyStats {
    pub labels: Vec<String>,
    pub data: Vec<u32>,
}

impl HourlyStats {
    /// Highest hourly count, zero when there is no data.
    #[must_use]
    pub fn peak(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    /// Label/count pairs in server order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }
}

/// Operations the sync engine needs from the scan server
#[allow(async_fn_in_trait)]
pub trait ScanApi {
    /// Full scan history, newest first
    async fn fetch_history(&self) -> Result<Vec<ScanRecord>>;

    /// Most recent candidate scans (at most one in practice)
    async fn fetch_latest(&self) -> Result<Vec<ScanCandidate>>;

    /// Persist a scan and return the canonical server record
    async fn persist(&self, candidate: &ScanCandidate) -> Result<ScanRecord>;

    /// Delete one scan; `Error::NotFound` when the id is unknown
    async fn delete(&self, id: ScanId) -> Result<()>;

    /// Delete every scan
    async fn delete_all(&self) -> Result<()>;

    /// Hourly scan counts for today
    async fn hourly_stats(&self) -> Result<HourlyStats>;
}

/// HTTP client for the scanner backend.
#[derive(Debug, Clone)]
pub struct HttpScanApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScanApi {
    /// Builds a client for an explicit server base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                Error::Transport(format!("Failed to construct HTTP client: {error}"))
            })?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch_history_page(&self, skip: usize, limit: usize) -> Result<Vec<ScanRecord>> {
        let response = self
            .client
            .get(self.url("/api/codes"))
            .query(&[("skip", skip), ("limit", limit)])
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response, "History request").await?;
        Ok(response.json::<Vec<ScanRecord>>().await?)
    }
}

impl ScanApi for HttpScanApi {
    async fn fetch_history(&self) -> Result<Vec<ScanRecord>> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut skip = 0usize;

        loop {
            let batch = self.fetch_history_page(skip, HISTORY_PAGE_SIZE).await?;
            let count = batch.len();
            let before = records.len();
            records.extend(batch.into_iter().filter(|record| seen.insert(record.id)));

            if count < HISTORY_PAGE_SIZE {
                break;
            }
            if records.len() == before {
                tracing::warn!("History page at skip={skip} repeated earlier scans; stopping");
                break;
            }
            skip += count;
        }

        Ok(records)
    }

    async fn fetch_latest(&self) -> Result<Vec<ScanCandidate>> {
        let response = self
            .client
            .get(self.url("/api/latest_codes"))
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response, "Latest scan request").await?;
        Ok(response.json::<Vec<ScanCandidate>>().await?)
    }

    async fn persist(&self, candidate: &ScanCandidate) -> Result<ScanRecord> {
        let response = self
            .client
            .post(self.url("/api/codes"))
            .json(candidate)
            .send()
            .await?;
        let response = ensure_success(response, "Save request").await?;
        Ok(response.json::<ScanRecord>().await?)
    }

    async fn delete(&self, id: ScanId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/codes/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }
        ensure_success(response, "Delete request").await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/api/codes/all"))
            .send()
            .await?;
        ensure_success(response, "Clear request").await?;
        Ok(())
    }

    async fn hourly_stats(&self) -> Result<HourlyStats> {
        let response = self
            .client
            .get(self.url("/api/stats/hourly"))
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = ensure_success(response, "Stats request").await?;
        Ok(response.json::<HourlyStats>().await?)
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Transport(format!(
        "{action} failed: {}",
        parse_api_error(status, &body)
    )))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        let detail = payload.detail.map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });
        if let Some(message) = detail.or(payload.message).or(payload.error) {
            return format!("{} ({})", shorten_error_body(&message), status.as_u16());
        }
    }

    let body = shorten_error_body(body);
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{body} ({})", status.as_u16())
    }
}

fn shorten_error_body(body: &str) -> String {
    body.trim().chars().take(ERROR_BODY_MAX_CHARS).collect()
}

/// Trim and validate a server base URL, dropping any trailing `/`.
pub fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = raw.trim().trim_end_matches('/');
    if base_url.is_empty() {
        return Err(Error::InvalidInput("server URL must not be empty".to_string()));
    }

    let host = base_url
        .strip_prefix("http://")
        .or_else(|| base_url.strip_prefix("https://"));
    match host {
        Some(host) if !host.is_empty() => Ok(base_url.to_string()),
        Some(_) => Err(Error::InvalidInput(format!(
            "server URL '{base_url}' has no host"
        ))),
        None => Err(Error::InvalidInput(
            "server URL must include http:// or https://".to_string(),
        )),
    }
}
