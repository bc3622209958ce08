//! Local cache of known scans
//!
//! Holds the records the server has confirmed, newest first for records
//! added locally, plus an index of which payloads are currently present.
//! The index counts occurrences per payload so that removing one of several
//! repeat scans keeps the payload known.

use std::collections::{HashMap, HashSet};

use crate::models::{ScanId, ScanRecord};

/// Ordered scan records plus the known-payload index
#[derive(Debug, Clone, Default)]
pub struct LocalCache {
    records: Vec<ScanRecord>,
    known: HashMap<String, usize>,
}

impl LocalCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with an authoritative server snapshot.
    pub fn load_all(&mut self, records: Vec<ScanRecord>) {
        self.records.clear();
        self.known.clear();
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.id) {
                tracing::warn!("Dropping duplicate scan id {} from snapshot", record.id);
                continue;
            }
            self.index(&record.data);
            self.records.push(record);
        }
    }

    /// Prepend a server-confirmed record.
    ///
    /// Payload duplicates are legitimate repeat scans and are kept. A record
    /// whose id is already cached replaces the stale copy.
    pub fn insert(&mut self, record: ScanRecord) {
        if let Some(position) = self.position(record.id) {
            let stale = self.records.remove(position);
            self.unindex(&stale.data);
        }
        self.index(&record.data);
        self.records.insert(0, record);
    }

    /// Remove the record with `id`, returning it when it was cached.
    pub fn remove(&mut self, id: ScanId) -> Option<ScanRecord> {
        let position = self.position(id)?;
        let removed = self.records.remove(position);
        self.unindex(&removed.data);
        Some(removed)
    }

    pub fn clear_all(&mut self) {
        self.records.clear();
        self.known.clear();
    }

    /// Whether any cached record carries this payload.
    #[must_use]
    pub fn contains(&self, data: &str) -> bool {
        self.known.contains_key(data)
    }

    /// Number of cached records carrying this exact payload.
    #[must_use]
    pub fn occurrence_count(&self, data: &str) -> usize {
        self.known.get(data).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn get(&self, id: ScanId) -> Option<&ScanRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    #[must_use]
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: ScanId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn index(&mut self, data: &str) {
        *self.known.entry(data.to_string()).or_insert(0) += 1;
    }

    fn unindex(&mut self, data: &str) {
        if let Some(count) = self.known.get_mut(data) {
            *count -= 1;
            if *count == 0 {
                self.known.remove(data);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::parse_timestamp;

    pub(crate) fn record(id: i64, data: &str, timestamp: &str) -> ScanRecord {
        ScanRecord {
            id: ScanId::new(id),
            data: data.to_string(),
            code_type: "EAN13".to_string(),
            product_name: None,
            timestamp: parse_timestamp(timestamp).unwrap(),
            scan_count: None,
        }
    }

    fn ids(cache: &LocalCache) -> Vec<i64> {
        cache.records().iter().map(|record| record.id.get()).collect()
    }

    #[test]
    fn insert_prepends_and_indexes() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "A", "2024-05-01T10:00:00"));
        cache.insert(record(2, "B", "2024-05-01T10:01:00"));

        assert_eq!(ids(&cache), vec![2, 1]);
        assert!(cache.contains("A"));
        assert!(cache.contains("B"));
        assert!(!cache.contains("C"));
    }

    #[test]
    fn load_all_replaces_contents_and_rebuilds_index() {
        let mut cache = LocalCache::new();
        cache.insert(record(9, "stale", "2024-05-01T10:00:00"));

        cache.load_all(vec![
            record(1, "A", "2024-05-01T10:00:00"),
            record(2, "B", "2024-05-01T11:00:00"),
        ]);

        assert_eq!(ids(&cache), vec![1, 2]);
        assert!(!cache.contains("stale"));
        assert!(cache.contains("A"));
    }

    #[test]
    fn remove_keeps_payload_known_while_duplicates_remain() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "X", "2024-05-01T10:00:00"));
        cache.insert(record(2, "X", "2024-05-01T10:05:00"));

        assert!(cache.remove(ScanId::new(1)).is_some());
        assert!(cache.contains("X"));

        assert!(cache.remove(ScanId::new(2)).is_some());
        assert!(!cache.contains("X"));
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "A", "2024-05-01T10:00:00"));

        assert!(cache.remove(ScanId::new(99)).is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("A"));
    }

    #[test]
    fn occurrence_count_tracks_inserts_and_removals() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "X", "2024-05-01T10:00:00"));
        cache.insert(record(2, "X", "2024-05-01T10:01:00"));
        cache.insert(record(3, "X", "2024-05-01T10:02:00"));
        cache.remove(ScanId::new(2));

        assert_eq!(cache.occurrence_count("X"), 2);
        assert_eq!(cache.occurrence_count("Y"), 0);
    }

    #[test]
    fn reinserting_same_id_replaces_record() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "A", "2024-05-01T10:00:00"));
        cache.insert(record(1, "B", "2024-05-01T10:00:00"));

        assert_eq!(cache.len(), 1);
        assert!(!cache.contains("A"));
        assert!(cache.contains("B"));
    }

    #[test]
    fn index_matches_records_after_mixed_operations() {
        let mut cache = LocalCache::new();
        let steps: [(bool, i64, &str); 8] = [
            (true, 1, "A"),
            (true, 2, "B"),
            (true, 3, "A"),
            (false, 1, ""),
            (true, 4, "C"),
            (false, 2, ""),
            (false, 42, ""),
            (false, 3, ""),
        ];

        for (is_insert, id, data) in steps {
            if is_insert {
                cache.insert(record(id, data, "2024-05-01T10:00:00"));
            } else {
                cache.remove(ScanId::new(id));
            }

            for candidate in ["A", "B", "C"] {
                let present = cache.records().iter().any(|r| r.data == candidate);
                assert_eq!(cache.contains(candidate), present, "payload {candidate}");
            }
        }

        assert_eq!(ids(&cache), vec![4]);
    }

    #[test]
    fn clear_all_empties_everything() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "A", "2024-05-01T10:00:00"));
        cache.clear_all();

        assert!(cache.is_empty());
        assert!(!cache.contains("A"));
    }
}
