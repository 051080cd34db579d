//! Step and compounded returns.
//!
//! `return_step[i] = price[i] / price[i-1] - 1`, and `return_cumulative` is the
//! running product of `(1 + return_step)` minus one. Both are undefined on the
//! first row.

use tracing::debug;
use trend_core::{Error, Result, Series, SeriesRow};

/// Derives `return_step` and `return_cumulative` from price.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnCalculator;

impl ReturnCalculator {
    /// Create a return calculator.
    pub fn new() -> Self {
        Self
    }

    /// Fill both return columns in place.
    ///
    /// Fails with a numeric error on a non-finite price or a zero divisor,
    /// rather than letting inf/NaN through as if it were a real return.
    pub fn apply(&self, series: &mut Series) -> Result<()> {
        let mut prev_price: Option<f64> = None;
        let mut growth = 1.0_f64;

        for (i, row) in series.rows_mut().iter_mut().enumerate() {
            if !row.price.is_finite() {
                return Err(numeric_error(i, row, "price is not finite"));
            }

            match prev_price {
                None => {
                    row.return_step = None;
                    row.return_cumulative = None;
                }
                Some(prev) => {
                    if prev == 0.0 {
                        return Err(numeric_error(i, row, "previous price is zero"));
                    }
                    let step = row.price / prev - 1.0;
                    growth *= 1.0 + step;
                    if !step.is_finite() || !growth.is_finite() {
                        return Err(numeric_error(i, row, "return overflowed"));
                    }
                    row.return_step = Some(step);
                    row.return_cumulative = Some(growth - 1.0);
                }
            }
            prev_price = Some(row.price);
        }

        debug!(rows = series.len(), "computed returns");
        Ok(())
    }
}

fn numeric_error(i: usize, row: &SeriesRow, reason: &str) -> Error {
    Error::numeric(format!(
        "row {i} (input row {}, time {}): {reason} (price={})",
        row.source_index, row.time, row.price
    ))
}
