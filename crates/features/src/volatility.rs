//! Rolling volatility computation.
//!
//! Computes the sample standard deviation of step returns over a rolling window.

use std::collections::VecDeque;

use statrs::statistics::Statistics;

/// Rolling volatility calculator over step returns.
#[derive(Debug, Clone)]
pub struct RollingVolatility {
    /// Window size in rows.
    window: usize,
    /// Recent returns; `None` where the return itself is undefined.
    returns: VecDeque<Option<f64>>,
}

impl RollingVolatility {
    /// Create a new rolling volatility calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            returns: VecDeque::with_capacity(window),
        }
    }

    /// Add one row's return.
    ///
    /// Returns the current volatility if it is defined.
    pub fn add_return(&mut self, ret: Option<f64>) -> Option<f64> {
        // If window is full, remove oldest
        if self.returns.len() >= self.window {
            self.returns.pop_front();
        }
        self.returns.push_back(ret);
        self.volatility()
    }

    /// Sample standard deviation (n-1) of the window.
    ///
    /// Undefined until the window is full, while any return in it is
    /// undefined, or with fewer than two returns.
    pub fn volatility(&self) -> Option<f64> {
        if !self.is_ready() || self.window < 2 {
            return None;
        }

        let values: Option<Vec<f64>> = self.returns.iter().copied().collect();
        let values = values?;
        Some(values.iter().std_dev())
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.returns.len() >= self.window
    }

    /// Get the number of observations.
    pub fn count(&self) -> usize {
        self.returns.len()
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.returns.clear();
    }
}
