//! Moving-average crossover detection and trend classification.
//!
//! `crossover_state` is `ma_short > ma_long` (strict: equal averages are
//! bearish). `crossover_delta` is the 0/1 change of that state from the
//! previous row, and the trend label is +1 golden, -1 death, else no signal.

use tracing::debug;
use trend_core::{Bias, Result, Series, Trend};

/// Assigns crossover state, transition, bias and trend per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier;

impl SignalClassifier {
    /// Create a signal classifier.
    pub fn new() -> Self {
        Self
    }

    /// Strict crossover state. Undefined unless both averages are.
    #[inline]
    pub fn crossover_state(ma_short: Option<f64>, ma_long: Option<f64>) -> Option<bool> {
        Some(ma_short? > ma_long?)
    }

    /// Signed change of the state between two consecutive rows.
    #[inline]
    pub fn crossover_delta(prev: Option<bool>, current: Option<bool>) -> Option<i8> {
        Some(current? as i8 - prev? as i8)
    }

    /// Fill the signal columns in place. Never fails; the `Result` keeps
    /// the stage signature uniform.
    pub fn apply(&self, series: &mut Series) -> Result<()> {
        let mut prev_state: Option<bool> = None;
        let mut golden = 0usize;
        let mut death = 0usize;

        for row in series.rows_mut() {
            let state = Self::crossover_state(row.ma_short, row.ma_long);
            let delta = Self::crossover_delta(prev_state, state);
            let trend = Trend::from_delta(delta);

            match trend {
                Trend::GoldenCross => golden += 1,
                Trend::DeathCross => death += 1,
                Trend::NoSignal => {}
            }

            row.crossover_state = state;
            row.crossover_delta = delta;
            row.bias = state.map(Bias::from_state);
            row.trend = Some(trend);
            prev_state = state;
        }

        debug!(rows = series.len(), golden, death, "classified crossovers");
        Ok(())
    }
}
