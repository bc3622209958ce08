//! Display projection over the local cache (search, sort, counters).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cache::LocalCache;
use crate::models::ScanRecord;

/// Display ordering for the scan list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// Aggregate counters shown next to the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub total: usize,
    pub today: usize,
}

/// Filter the cache by case-insensitive substring match on product name or
/// payload, then sort by `sort`.
///
/// The sort is stable, so records with equal keys keep cache order.
#[must_use]
pub fn project<'a>(cache: &'a LocalCache, filter: &str, sort: SortKey) -> Vec<&'a ScanRecord> {
    let needle = filter.to_lowercase();
    let mut records = cache
        .records()
        .iter()
        .filter(|record| record_matches(record, &needle))
        .collect::<Vec<_>>();

    match sort {
        SortKey::Newest => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortKey::Oldest => records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        SortKey::Name => records.sort_by(|a, b| compare_names(a, b)),
    }

    records
}

/// How many cached records share this exact payload.
#[must_use]
pub fn occurrence_count(cache: &LocalCache, data: &str) -> usize {
    cache.occurrence_count(data)
}

/// Totals for the cache, counting records from `today` (local calendar day).
#[must_use]
pub fn stats(cache: &LocalCache, today: NaiveDate) -> ScanStats {
    ScanStats {
        total: cache.len(),
        today: cache
            .records()
            .iter()
            .filter(|record| record.timestamp.date() == today)
            .count(),
    }
}

#[must_use]
pub fn stats_now(cache: &LocalCache) -> ScanStats {
    stats(cache, Local::now().date_naive())
}

fn record_matches(record: &ScanRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let name_matches = record
        .product_name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(needle));
    name_matches || record.data.to_lowercase().contains(needle)
}

fn compare_names(a: &ScanRecord, b: &ScanRecord) -> Ordering {
    let (a, b) = (a.display_name(), b.display_name());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
