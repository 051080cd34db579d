//! Configuration for the indicator pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default short moving-average window (rows).
pub const DEFAULT_SHORT_WINDOW: usize = 20;
/// Default long moving-average window (rows).
pub const DEFAULT_LONG_WINDOW: usize = 50;

/// Pipeline configuration: input column names and window lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the timestamp column.
    pub time_column: String,
    /// Name of the price (close) column.
    pub price_column: String,
    /// Short moving-average and volatility window.
    pub short_window: usize,
    /// Long moving-average window.
    pub long_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_column: "time".to_string(),
            price_column: "price".to_string(),
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl PipelineConfig {
    /// Decode a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set both window lengths.
    pub fn with_windows(mut self, short_window: usize, long_window: usize) -> Self {
        self.short_window = short_window;
        self.long_window = long_window;
        self
    }

    /// Set both column names.
    pub fn with_columns(
        mut self,
        time_column: impl Into<String>,
        price_column: impl Into<String>,
    ) -> Self {
        self.time_column = time_column.into();
        self.price_column = price_column.into();
        self
    }

    /// Check window and column invariants.
    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(Error::config(format!(
                "windows must be >= 1 (short={}, long={})",
                self.short_window, self.long_window
            )));
        }
        if self.short_window >= self.long_window {
            return Err(Error::config(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }
        if self.time_column.is_empty() || self.price_column.is_empty() {
            return Err(Error::config("column names must not be empty"));
        }
        if self.time_column == self.price_column {
            return Err(Error::config(format!(
                "time and price columns must differ (both '{}')",
                self.time_column
            )));
        }
        Ok(())
    }
}
