//! Data layer for post-trends.
//!
//! Responsible for reading per-country CSV exports, running the multi-country
//! ingestion pipeline, aggregating records by country and month, and rendering
//! the resulting report.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod report;

pub use trends_core as core;
