pub mod clear;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod export;
pub mod list;
pub mod stats;
pub mod watch;
