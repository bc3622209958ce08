//! Data models for scanwatch

mod scan;

pub use scan::{
    is_recognized_product, parse_timestamp, ScanCandidate, ScanId, ScanRecord, CUSTOM_PRODUCT,
    PRODUCT_UNKNOWN,
};
