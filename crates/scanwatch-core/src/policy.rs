//! Ingestion policy: what to do with a freshly observed scan.

use crate::cache::LocalCache;
use crate::models::ScanCandidate;

/// Outcome of classifying a candidate scan against the local cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Payload is already cached
    Ignore,
    /// Server recognized the product; persist without asking
    AutoPersist(ScanCandidate),
    /// Unknown product; the operator has to confirm a label first
    Escalate(ScanCandidate),
}

/// Classify a candidate scan.
///
/// A payload already present in the cache is always ignored, whatever
/// product name the server attached to it this time.
#[must_use]
pub fn classify(cache: &LocalCache, candidate: ScanCandidate) -> Classification {
    if cache.contains(&candidate.data) {
        return Classification::Ignore;
    }

    if candidate.recognized_product().is_some() {
        Classification::AutoPersist(candidate)
    } else {
        Classification::Escalate(candidate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cache::tests::record;
    use crate::models::PRODUCT_UNKNOWN;

    #[test]
    fn cached_payload_is_ignored_regardless_of_product() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "123", "2024-05-01T10:00:00"));

        for product in [None, Some(PRODUCT_UNKNOWN), Some("Milk")] {
            let mut candidate = ScanCandidate::new("123", "EAN13");
            candidate.product_name = product.map(ToString::to_string);
            for _ in 0..3 {
                assert_eq!(classify(&cache, candidate.clone()), Classification::Ignore);
            }
        }
    }

    #[test]
    fn recognized_product_is_auto_persisted() {
        let cache = LocalCache::new();
        let candidate = ScanCandidate::new("555", "EAN13")
            .with_product_name("Oat Milk")
            .with_scan_count(4);

        assert_eq!(
            classify(&cache, candidate.clone()),
            Classification::AutoPersist(candidate)
        );
    }

    #[test]
    fn whitespace_product_name_is_auto_persisted() {
        let cache = LocalCache::new();
        let candidate = ScanCandidate::new("556", "EAN13").with_product_name("  ");

        assert_eq!(
            classify(&cache, candidate.clone()),
            Classification::AutoPersist(candidate)
        );
    }

    #[test]
    fn unknown_product_is_escalated() {
        let cache = LocalCache::new();
        let missing = ScanCandidate::new("777", "QRCODE");
        let sentinel = ScanCandidate::new("778", "QRCODE").with_product_name(PRODUCT_UNKNOWN);

        assert_eq!(
            classify(&cache, missing.clone()),
            Classification::Escalate(missing)
        );
        assert_eq!(
            classify(&cache, sentinel.clone()),
            Classification::Escalate(sentinel)
        );
    }

    #[test]
    fn removed_payload_is_no_longer_ignored() {
        let mut cache = LocalCache::new();
        cache.insert(record(1, "123", "2024-05-01T10:00:00"));
        cache.remove(crate::models::ScanId::new(1));

        let candidate = ScanCandidate::new("123", "EAN13");
        assert_eq!(
            classify(&cache, candidate.clone()),
            Classification::Escalate(candidate)
        );
    }
}
