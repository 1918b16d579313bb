//! Parsing core for post-trends.
//!
//! Turns raw export lines into normalised [`models::Record`]s: date
//! resolution, text cleanup and the two-comma row split. Parsing never does
//! I/O and never fails on bad input. Also home to the shared error type, CLI
//! settings and report line formats.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod parser;
pub mod settings;
pub mod text;
pub mod time_utils;

pub use error::{Result, TrendsError};
