//! Series normalization.
//!
//! Validates the time and price columns, parses timestamps, and orders the
//! rows by time. Rows with equal timestamps keep their input order.

use std::collections::BTreeMap;

use tracing::debug;
use trend_core::{Error, PipelineConfig, RawTable, RawValue, Result, Series, SeriesRow};

use crate::timestamp::parse_timestamp;

/// Turns a raw input table into a time-ordered [`Series`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    time_column: String,
    price_column: String,
}

impl Normalizer {
    /// Create a normalizer for the given column names.
    pub fn new(time_column: impl Into<String>, price_column: impl Into<String>) -> Self {
        Self {
            time_column: time_column.into(),
            price_column: price_column.into(),
        }
    }

    /// Create a normalizer from pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.time_column.clone(), config.price_column.clone())
    }

    /// Parse, validate and sort the input.
    pub fn normalize(&self, table: &RawTable) -> Result<Series> {
        let times = self.required_column(table, &self.time_column)?;
        let prices = self.required_column(table, &self.price_column)?;

        let extras: Vec<(&str, &[RawValue])> = table
            .columns()
            .filter(|(name, _)| *name != self.time_column && *name != self.price_column)
            .collect();

        let mut rows = Vec::with_capacity(table.row_count());
        for (i, (time_cell, price_cell)) in times.iter().zip(prices).enumerate() {
            let time = parse_timestamp(time_cell).ok_or_else(|| {
                Error::schema(format!(
                    "column '{}' row {i}: cannot parse {} {time_cell} as a timestamp",
                    self.time_column,
                    time_cell.type_name()
                ))
            })?;
            let price = self.parse_price(price_cell, i)?;

            let extra: BTreeMap<String, RawValue> = extras
                .iter()
                .map(|(name, values)| (name.to_string(), values[i].clone()))
                .collect();

            rows.push(SeriesRow::new(i, time, price, extra));
        }

        // Stable: ties keep input order.
        rows.sort_by_key(|row| row.time);

        debug!(
            rows = rows.len(),
            passthrough_columns = extras.len(),
            "normalized series"
        );

        Ok(Series::new(rows))
    }

    fn required_column<'a>(&self, table: &'a RawTable, name: &str) -> Result<&'a [RawValue]> {
        table.column(name).ok_or_else(|| {
            Error::schema(format!(
                "missing required column '{name}' (available: [{}])",
                table.column_names().join(", ")
            ))
        })
    }

    fn parse_price(&self, cell: &RawValue, row: usize) -> Result<f64> {
        let parsed = match cell {
            RawValue::Float(x) => Some(*x),
            RawValue::Int(i) => Some(*i as f64),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Null | RawValue::Bool(_) => None,
        };
        parsed.ok_or_else(|| {
            Error::schema(format!(
                "column '{}' row {row}: expected a number, got {} {cell}",
                self.price_column,
                cell.type_name()
            ))
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trend_core::ErrorKind;

    fn table(times: &[&str], prices: &[f64]) -> RawTable {
        RawTable::new()
            .with_column("time", times.iter().copied())
            .unwrap()
            .with_column("price", prices.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_sorts_by_time() {
        let input = table(&["2023-01-03", "2023-01-01", "2023-01-02"], &[102.0, 100.0, 101.0]);
        let series = Normalizer::default().normalize(&input).unwrap();

        let prices: Vec<f64> = series.prices().collect();
        assert_eq!(prices, vec![100.0, 101.0, 102.0]);
        assert_eq!(series.rows()[0].time, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(series.rows()[0].source_index, 1);
        assert!(series.rows().windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = table(
            &["2023-01-02", "2023-01-01", "2023-01-02", "2023-01-01"],
            &[1.0, 2.0, 3.0, 4.0],
        );
        let series = Normalizer::default().normalize(&input).unwrap();

        let prices: Vec<f64> = series.prices().collect();
        assert_eq!(prices, vec![2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn test_missing_column() {
        let input = RawTable::new().with_column("time", ["2023-01-01"]).unwrap();
        let err = Normalizer::default().normalize(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("'price'"));
    }

    #[test]
    fn test_custom_column_names() {
        let input = RawTable::new()
            .with_column("date", ["2023-01-02", "2023-01-01"])
            .unwrap()
            .with_column("close", [101.0, 100.0])
            .unwrap();
        let series = Normalizer::new("date", "close").normalize(&input).unwrap();
        assert_eq!(series.prices().collect::<Vec<_>>(), vec![100.0, 101.0]);

        assert!(Normalizer::default().normalize(&input).is_err());
    }

    #[test]
    fn test_unparseable_time() {
        let input = table(&["2023-01-01", "not a date"], &[100.0, 101.0]);
        let err = Normalizer::default().normalize(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_mistyped_price() {
        let input = RawTable::new()
            .with_column("time", ["2023-01-01", "2023-01-02"])
            .unwrap()
            .with_column("price", [RawValue::Float(100.0), RawValue::Null])
            .unwrap();
        let err = Normalizer::default().normalize(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);

        let input = RawTable::new()
            .with_column("time", ["2023-01-01"])
            .unwrap()
            .with_column("price", ["abc"])
            .unwrap();
        assert!(Normalizer::default().normalize(&input).is_err());
    }

    #[test]
    fn test_numeric_text_and_int_prices() {
        let input = RawTable::new()
            .with_column("time", ["2023-01-01", "2023-01-02"])
            .unwrap()
            .with_column("price", [RawValue::Int(100), RawValue::Text(" 101.5".into())])
            .unwrap();
        let series = Normalizer::default().normalize(&input).unwrap();
        assert_eq!(series.prices().collect::<Vec<_>>(), vec![100.0, 101.5]);
    }

    #[test]
    fn test_non_finite_price_is_not_a_schema_error() {
        let input = table(&["2023-01-01"], &[f64::NAN]);
        let series = Normalizer::default().normalize(&input).unwrap();
        assert!(series.rows()[0].price.is_nan());
    }

    #[test]
    fn test_extra_columns_carried() {
        let input = table(&["2023-01-02", "2023-01-01"], &[101.0, 100.0])
            .with_column("volume", [RawValue::Int(7), RawValue::Int(5)])
            .unwrap();
        let series = Normalizer::default().normalize(&input).unwrap();

        assert_eq!(series.rows()[0].extra.get("volume"), Some(&RawValue::Int(5)));
        assert_eq!(series.rows()[1].extra.get("volume"), Some(&RawValue::Int(7)));
        assert!(!series.rows()[0].extra.contains_key("price"));
    }

    #[test]
    fn test_empty_table() {
        let input = table(&[], &[]);
        let series = Normalizer::default().normalize(&input).unwrap();
        assert!(series.is_empty());
    }
}
