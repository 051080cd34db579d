//! Trend summary report.
//!
//! Condenses a finalized indicator table into the handful of numbers a
//! narrative report needs.

use std::fmt;

use serde::Serialize;
use statrs::statistics::Statistics;
use trend_core::{Bias, IndicatorTable, Timestamp, Trend};

/// A single crossover event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalEvent {
    pub time: Timestamp,
    pub trend: Trend,
    pub price: f64,
}

/// Summary statistics over a finalized table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    /// Number of rows.
    pub rows: usize,
    /// First timestamp.
    pub start: Timestamp,
    /// Last timestamp.
    pub end: Timestamp,
    pub first_price: f64,
    pub last_price: f64,
    /// Compounded return at the last row, measured from the start of the input.
    pub total_return: f64,
    pub golden_crosses: u32,
    pub death_crosses: u32,
    /// Most recent golden or death cross.
    pub last_signal: Option<SignalEvent>,
    /// Bias at the last row.
    pub latest_bias: Bias,
    /// Mean short-window volatility.
    pub mean_volatility: f64,
    /// Max short-window volatility.
    pub max_volatility: f64,
}

impl TrendSummary {
    /// Summarize a table. Returns `None` for an empty table.
    pub fn from_table(table: &IndicatorTable) -> Option<Self> {
        let first = table.first()?;
        let last = table.last()?;

        let mut golden_crosses = 0;
        let mut death_crosses = 0;
        let mut last_signal = None;
        for row in table.iter().filter(|r| r.trend.is_signal()) {
            if row.trend == Trend::GoldenCross {
                golden_crosses += 1;
            } else {
                death_crosses += 1;
            }
            last_signal = Some(SignalEvent {
                time: row.time,
                trend: row.trend,
                price: row.price,
            });
        }

        let volatilities: Vec<f64> = table.iter().map(|r| r.volatility_short).collect();

        Some(Self {
            rows: table.len(),
            start: first.time,
            end: last.time,
            first_price: first.price,
            last_price: last.price,
            total_return: last.return_cumulative,
            golden_crosses,
            death_crosses,
            last_signal,
            latest_bias: last.bias,
            mean_volatility: Statistics::mean(volatilities.iter()),
            max_volatility: Statistics::max(volatilities.iter()),
        })
    }

    /// Serialize the summary as JSON.
    pub fn to_json(&self) -> trend_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for TrendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Period: {} .. {} ({} rows)",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S"),
            self.rows
        )?;
        writeln!(f, "Price: {:.4} -> {:.4}", self.first_price, self.last_price)?;
        writeln!(f, "Total return: {:.2}%", self.total_return * 100.0)?;
        writeln!(
            f,
            "Crossovers: {} golden, {} death",
            self.golden_crosses, self.death_crosses
        )?;
        match &self.last_signal {
            Some(event) => writeln!(
                f,
                "Last signal: {} at {} (price {:.4})",
                event.trend,
                event.time.format("%Y-%m-%d %H:%M:%S"),
                event.price
            )?,
            None => writeln!(f, "Last signal: none")?,
        }
        writeln!(f, "Current bias: {}", self.latest_bias)?;
        write!(
            f,
            "Volatility: mean {:.6}, max {:.6}",
            self.mean_volatility, self.max_volatility
        )
    }
}
