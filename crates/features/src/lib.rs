//! Indicator computation for the trend-signal pipeline.
//!
//! This crate handles:
//! - Step and compounded returns
//! - Short/long simple moving averages
//! - Rolling volatility of returns
//! - Crossover detection and trend classification

pub mod moving_average;
pub mod returns;
pub mod signal;
pub mod volatility;

pub use moving_average::{MovingAverageCalculator, RollingMean};
pub use returns::ReturnCalculator;
pub use signal::SignalClassifier;
pub use volatility::RollingVolatility;
