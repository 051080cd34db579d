//! Data ingestion and normalization for the trend-signal pipeline.
//!
//! This crate handles:
//! - Timestamp parsing (RFC 3339, naive date-times, dates, epoch millis)
//! - Required-column validation
//! - Stable time ordering of the series

pub mod normalizer;
pub mod timestamp;

pub use normalizer::Normalizer;
pub use timestamp::parse_timestamp;
