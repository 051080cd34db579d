//! Short/long simple moving averages and short-window volatility.
//!
//! A window of `W` rows ends at and includes the current row, so row `i`
//! (0-based) gets a value iff `i >= W - 1`.

use std::collections::VecDeque;

use tracing::debug;
use trend_core::{Error, PipelineConfig, Result, Series, SeriesRow};

use crate::volatility::RollingVolatility;

/// Trailing simple moving average.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    values: VecDeque<f64>,
}

impl RollingMean {
    /// Create an empty window of `window` rows.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Add a value and return the mean if the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.values.len() >= self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.mean()
    }

    /// Mean of the current window.
    ///
    /// Summed from the window each time so that equal windows give
    /// bit-identical means; a running sum would drift.
    pub fn mean(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        let sum: f64 = self.values.iter().sum();
        Some(sum / self.window as f64)
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.window > 0 && self.values.len() >= self.window
    }
}

/// Derives `ma_short`, `ma_long` and `volatility_short`.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverageCalculator {
    short_window: usize,
    long_window: usize,
}

impl MovingAverageCalculator {
    /// Create a calculator. Requires `1 <= short_window < long_window`.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self> {
        if short_window == 0 || short_window >= long_window {
            return Err(Error::config(format!(
                "moving-average windows must satisfy 1 <= short < long \
                 (short={short_window}, long={long_window})"
            )));
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    /// Create a calculator from pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.short_window, config.long_window)
    }

    /// Fill the average and volatility columns in place.
    ///
    /// Expects `return_step` to be populated already. A window whose
    /// statistic overflows to a non-finite value is a numeric error.
    pub fn apply(&self, series: &mut Series) -> Result<()> {
        let mut short = RollingMean::new(self.short_window);
        let mut long = RollingMean::new(self.long_window);
        let mut volatility = RollingVolatility::new(self.short_window);

        for (i, row) in series.rows_mut().iter_mut().enumerate() {
            let ma_short = finite(short.push(row.price), "ma_short", i, row)?;
            let ma_long = finite(long.push(row.price), "ma_long", i, row)?;
            let volatility_short =
                finite(volatility.add_return(row.return_step), "volatility_short", i, row)?;

            row.ma_short = ma_short;
            row.ma_long = ma_long;
            row.volatility_short = volatility_short;
        }

        debug!(
            rows = series.len(),
            short_window = self.short_window,
            long_window = self.long_window,
            "computed moving averages"
        );
        Ok(())
    }
}

fn finite(value: Option<f64>, column: &str, i: usize, row: &SeriesRow) -> Result<Option<f64>> {
    match value {
        Some(x) if !x.is_finite() => Err(Error::numeric(format!(
            "row {i} (input row {}, time {}): {column} is not finite ({x})",
            row.source_index, row.time
        ))),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::returns::ReturnCalculator;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;
    use trend_core::ErrorKind;

    fn series(prices: &[f64]) -> Series {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let rows = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| SeriesRow::new(i, start + Duration::days(i as i64), p, BTreeMap::new()))
            .collect();
        let mut series = Series::new(rows);
        ReturnCalculator::new().apply(&mut series).unwrap();
        series
    }

    #[test]
    fn test_rolling_mean() {
        let mut mean = RollingMean::new(2);
        assert!(mean.push(100.0).is_none());
        assert_eq!(mean.push(101.0), Some(100.5));
        assert_eq!(mean.push(103.0), Some(102.0));
    }

    #[test]
    fn test_window_validation() {
        assert_eq!(MovingAverageCalculator::new(50, 20).unwrap_err().kind(), ErrorKind::Config);
        assert!(MovingAverageCalculator::new(0, 20).is_err());
        assert!(MovingAverageCalculator::new(20, 20).is_err());
        assert!(MovingAverageCalculator::new(2, 3).is_ok());
    }

    #[test]
    fn test_definedness_boundaries() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let mut s = series(&prices);
        MovingAverageCalculator::new(3, 5).unwrap().apply(&mut s).unwrap();

        for (i, row) in s.rows().iter().enumerate() {
            assert_eq!(row.ma_short.is_some(), i >= 2, "ma_short at {i}");
            assert_eq!(row.ma_long.is_some(), i >= 4, "ma_long at {i}");
            // Row 0 has no return, so the first clean window ends at row 3
            assert_eq!(row.volatility_short.is_some(), i >= 3, "volatility at {i}");
        }
    }

    #[test]
    fn test_average_values() {
        let mut s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        MovingAverageCalculator::new(2, 4).unwrap().apply(&mut s).unwrap();
        let rows = s.rows();

        assert_relative_eq!(rows[1].ma_short.unwrap(), 1.5);
        assert_relative_eq!(rows[5].ma_short.unwrap(), 5.5);
        assert_relative_eq!(rows[3].ma_long.unwrap(), 2.5);
        assert_relative_eq!(rows[5].ma_long.unwrap(), 4.5);
    }

    #[test]
    fn test_volatility_value() {
        // Returns: -, 0.1, -0.1, 0.1 ... over a window of 3
        let mut s = series(&[100.0, 110.0, 99.0, 108.9]);
        MovingAverageCalculator::new(3, 4).unwrap().apply(&mut s).unwrap();

        let r: Vec<f64> = s.rows()[1..].iter().map(|row| row.return_step.unwrap()).collect();
        let mean = r.iter().sum::<f64>() / 3.0;
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;

        assert_relative_eq!(s.rows()[3].volatility_short.unwrap(), var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_overflowing_average_is_numeric_error() {
        let prices: Vec<f64> = (0..10).map(|i| 1.0e308 + i as f64 * 0.07e308).collect();
        let mut s = series(&prices);
        let err = MovingAverageCalculator::new(2, 3).unwrap().apply(&mut s).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Numeric);
        assert!(err.to_string().contains("ma_short"));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_overflowing_volatility_is_numeric_error() {
        // Returns alternate between ~1e160 and ~-1; their variance exceeds f64::MAX
        let prices = [1.0e-160, 1.0, 1.0e-160, 1.0, 1.0e-160];
        let mut s = series(&prices);
        let err = MovingAverageCalculator::new(2, 3).unwrap().apply(&mut s).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Numeric);
        assert!(err.to_string().contains("volatility_short"));
    }

    #[test]
    fn test_shorter_than_window() {
        let mut s = series(&[100.0, 101.0, 102.0]);
        MovingAverageCalculator::from_config(&PipelineConfig::default())
            .unwrap()
            .apply(&mut s)
            .unwrap();
        assert!(s.rows().iter().all(|r| r.ma_short.is_none() && r.ma_long.is_none()));
        assert!(s.rows().iter().all(|r| r.volatility_short.is_none()));
    }
}
