//! Indicator pipeline orchestration for the trend-signal system.
//!
//! This crate handles:
//! - Running the stages in order (normalize, returns, averages, signals, finalize)
//! - Dropping rows with incomplete indicators
//! - Summary reports over the finalized table
//! - Tracing setup

pub mod finalizer;
pub mod pipeline;
pub mod summary;
pub mod telemetry;

pub use finalizer::Finalizer;
pub use pipeline::{run, Pipeline};
pub use summary::{SignalEvent, TrendSummary};
pub use telemetry::init_tracing;
