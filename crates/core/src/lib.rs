//! Core types and configuration for the trend-signal pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Raw input tables and the working series
//! - Finalized indicator rows and trend labels
//! - Pipeline configuration
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, ErrorKind, Result};
pub use types::*;
