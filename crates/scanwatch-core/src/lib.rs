//! scanwatch-core - Core library for scanwatch
//!
//! This crate contains the scan models, the reconciliation state machine
//! (local cache, ingestion policy, confirmation gate, sync engine), the
//! display projection, and the HTTP client for the scanner backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod gate;
pub mod models;
pub mod policy;
pub mod sync;
pub mod view;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use models::{ScanCandidate, ScanId, ScanRecord};
