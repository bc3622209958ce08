//! Scan models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Label the server reports when no product could be resolved for a code.
pub const PRODUCT_UNKNOWN: &str = "Product Unknown";

/// Label applied when the operator accepts a scan without typing a name.
pub const CUSTOM_PRODUCT: &str = "Custom Product";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Server-assigned identifier of a persisted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(i64);

impl ScanId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScanId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A scan persisted by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Server-assigned identifier
    pub id: ScanId,
    /// Raw decoded payload; the deduplication key
    pub data: String,
    /// Symbology label such as `EAN13` or `QRCODE`
    #[serde(rename = "type")]
    pub code_type: String,
    /// Product label, possibly the `Product Unknown` sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Creation time as local wall-clock time
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// Observations of this payload known to the server at ingestion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_count: Option<u32>,
}

impl ScanRecord {
    /// Product name when present, otherwise the raw payload.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.data)
    }
}

/// A freshly observed scan, not yet persisted
///
/// This is both what the latest-scan endpoint reports and what gets
/// submitted for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCandidate {
    pub data: String,
    #[serde(rename = "type")]
    pub code_type: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_count: Option<u32>,
}

impl ScanCandidate {
    #[must_use]
    pub fn new(data: impl Into<String>, code_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            code_type: code_type.into(),
            product_name: None,
            scan_count: None,
        }
    }

    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    #[must_use]
    pub const fn with_scan_count(mut self, scan_count: u32) -> Self {
        self.scan_count = Some(scan_count);
        self
    }

    /// The product name if the server resolved one.
    #[must_use]
    pub fn recognized_product(&self) -> Option<&str> {
        self.product_name
            .as_deref()
            .filter(|name| is_recognized_product(name))
    }
}

/// Whether a product label names a real product rather than the sentinel.
#[must_use]
pub fn is_recognized_product(name: &str) -> bool {
    !name.is_empty() && name != PRODUCT_UNKNOWN
}

/// Parse a server timestamp into local wall-clock time.
///
/// Naive ISO timestamps are taken as already local. Timestamps carrying an
/// offset are converted to the local zone.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Local).naive_local());
    }

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|error| format!("invalid timestamp '{raw}': {error}"))
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserializes_server_record() {
        let payload = r#"{
            "id": 42,
            "data": "4006381333931",
            "type": "EAN13",
            "product_name": "Stabilo Pen",
            "timestamp": "2024-05-01T09:30:15.123456"
        }"#;

        let record: ScanRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.id, ScanId::new(42));
        assert_eq!(record.code_type, "EAN13");
        assert_eq!(record.product_name.as_deref(), Some("Stabilo Pen"));
        assert_eq!(record.scan_count, None);
        assert_eq!(
            record.timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(record.timestamp.hour(), 9);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let payload = r#"{"data": "123", "type": "EAN13", "timestamp": "2024-05-01T09:30:15"}"#;
        assert!(serde_json::from_str::<ScanRecord>(payload).is_err());
    }

    #[test]
    fn parse_timestamp_accepts_space_separator_and_no_fraction() {
        let parsed = parse_timestamp("2024-05-01 23:59:01").unwrap();
        assert_eq!(parsed.minute(), 59);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn candidate_serializes_with_wire_names() {
        let candidate = ScanCandidate::new("123", "EAN13").with_product_name("Milk");
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"data": "123", "type": "EAN13", "product_name": "Milk"})
        );
    }

    #[test]
    fn recognized_product_skips_sentinel_and_empty() {
        assert_eq!(ScanCandidate::new("1", "QR").recognized_product(), None);
        assert_eq!(
            ScanCandidate::new("1", "QR")
                .with_product_name(PRODUCT_UNKNOWN)
                .recognized_product(),
            None
        );
        assert_eq!(
            ScanCandidate::new("1", "QR")
                .with_product_name("")
                .recognized_product(),
            None
        );
        assert_eq!(
            ScanCandidate::new("1", "QR")
                .with_product_name("  ")
                .recognized_product(),
            Some("  ")
        );
        assert_eq!(
            ScanCandidate::new("1", "QR")
                .with_product_name("Tea")
                .recognized_product(),
            Some("Tea")
        );
    }

    #[test]
    fn display_name_falls_back_to_data() {
        let record = ScanRecord {
            id: ScanId::new(1),
            data: "ABC-1".to_string(),
            code_type: "CODE128".to_string(),
            product_name: None,
            timestamp: parse_timestamp("2024-05-01T10:00:00").unwrap(),
            scan_count: Some(1),
        };
        assert_eq!(record.display_name(), "ABC-1");
    }

    #[test]
    fn scan_id_parses_trimmed_text() {
        assert_eq!(" 17 ".parse::<ScanId>().unwrap(), ScanId::new(17));
        assert!("abc".parse::<ScanId>().is_err());
    }
}
