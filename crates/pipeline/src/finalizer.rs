//! Drops rows that cannot carry a full indicator set.

use tracing::{debug, warn};
use trend_core::{Error, IndicatorRow, IndicatorTable, Result, Series, SeriesRow};

/// Keeps only rows whose every derived column is defined.
#[derive(Debug, Clone, Copy, Default)]
pub struct Finalizer;

impl Finalizer {
    /// Create a finalizer.
    pub fn new() -> Self {
        Self
    }

    /// Filter and densely re-index the series.
    ///
    /// An all-undefined series (e.g. shorter than the long window) yields
    /// `Error::EmptyResult`, which callers may treat as a normal outcome.
    pub fn apply(&self, series: Series) -> Result<IndicatorTable> {
        let total = series.len();
        let rows: Vec<IndicatorRow> = series
            .rows()
            .iter()
            .filter_map(SeriesRow::to_indicator_row)
            .collect();

        debug!(kept = rows.len(), dropped = total - rows.len(), "finalized series");

        if rows.is_empty() {
            warn!(rows = total, "no row has a complete indicator set");
            return Err(Error::empty_result(format!(
                "all {total} rows have at least one undefined indicator"
            )));
        }

        Ok(IndicatorTable::new(rows))
    }
}
