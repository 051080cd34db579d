//! Core data types for the trend-signal pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parsed observation timestamp (UTC).
pub type Timestamp = DateTime<Utc>;

/// A single untyped cell of caller-supplied input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Missing cell.
    Null,
    Bool(bool),
    /// Integer; in a time column, milliseconds since the Unix epoch.
    Int(i64),
    Float(f64),
    /// Free text (dates, numeric strings, labels).
    Text(String),
}

impl RawValue {
    /// Short name of the cell's shape, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::Text(_) => "text",
        }
    }

    fn from_json(value: serde_json::Value, column: &str, row: usize) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(RawValue::Null),
            Value::Bool(b) => Ok(RawValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(RawValue::Int(i)),
                None => n.as_f64().map(RawValue::Float).ok_or_else(|| {
                    Error::schema(format!("column '{column}' row {row}: number {n} out of range"))
                }),
            },
            Value::String(s) => Ok(RawValue::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(Error::schema(format!(
                "column '{column}' row {row}: nested values are not supported"
            ))),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(x) => write!(f, "{x}"),
            RawValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

/// Column-addressable raw input table. All columns have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<(String, Vec<RawValue>)>,
    row_count: usize,
}

impl RawTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Fails on a duplicate name or a length mismatch.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<RawValue>) -> Result<()> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(Error::schema(format!("duplicate column '{name}'")));
        }
        if !self.columns.is_empty() && values.len() != self.row_count {
            return Err(Error::schema(format!(
                "column '{name}' has {} rows, expected {}",
                values.len(),
                self.row_count
            )));
        }
        self.row_count = values.len();
        self.columns.push((name, values));
        Ok(())
    }

    /// Builder form of [`RawTable::push_column`].
    pub fn with_column<V: Into<RawValue>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.push_column(name, values.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    /// Build a table from a JSON array of flat objects.
    ///
    /// Keys become columns in first-seen order; a key missing from a record is `null`.
    pub fn from_json_records(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(records) = value else {
            return Err(Error::schema("expected a JSON array of records"));
        };

        let mut objects = Vec::with_capacity(records.len());
        let mut names: Vec<String> = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            let serde_json::Value::Object(object) = record else {
                return Err(Error::schema(format!("record {row} is not a JSON object")));
            };
            for key in object.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
            objects.push(object);
        }

        let mut table = RawTable::new();
        for name in names {
            let mut values = Vec::with_capacity(objects.len());
            for (row, object) in objects.iter_mut().enumerate() {
                let cell = object.remove(&name).unwrap_or(serde_json::Value::Null);
                values.push(RawValue::from_json(cell, &name, row)?);
            }
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&[RawValue]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate over `(name, values)` pairs in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[RawValue])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

}

/// Trend label derived from a moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Short average crossed above the long average.
    GoldenCross,
    /// Short average crossed below the long average.
    DeathCross,
    /// No crossover on this row.
    NoSignal,
}

impl Trend {
    /// Classify a crossover transition. Anything but +1/-1 is `NoSignal`.
    pub fn from_delta(delta: Option<i8>) -> Self {
        match delta {
            Some(1) => Trend::GoldenCross,
            Some(-1) => Trend::DeathCross,
            _ => Trend::NoSignal,
        }
    }

    /// Wire name of the label.
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::GoldenCross => "golden_cross",
            Trend::DeathCross => "death_cross",
            Trend::NoSignal => "no_signal",
        }
    }

    /// Is this an actual crossover event?
    pub fn is_signal(self) -> bool {
        !matches!(self, Trend::NoSignal)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standing relation of the short average to the long average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    /// Short average strictly above the long average.
    Bullish,
    /// Short average at or below the long average.
    Bearish,
}

impl Bias {
    /// Bias for a crossover state (`true` means short above long).
    pub fn from_state(crossover_state: bool) -> Self {
        if crossover_state {
            Bias::Bullish
        } else {
            Bias::Bearish
        }
    }

    /// Wire name of the bias.
    pub fn as_str(self) -> &'static str {
        match self {
            Bias::Bullish => "bullish",
            Bias::Bearish => "bearish",
        }
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of the working series. Derived columns are `None`
/// until their defining window is satisfied.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRow {
    /// Position of this row in the caller's input.
    pub source_index: usize,
    pub time: Timestamp,
    pub price: f64,
    /// Non-required input cells, carried through untouched.
    pub extra: BTreeMap<String, RawValue>,
    pub return_step: Option<f64>,
    pub return_cumulative: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub volatility_short: Option<f64>,
    pub crossover_state: Option<bool>,
    pub crossover_delta: Option<i8>,
    pub bias: Option<Bias>,
    pub trend: Option<Trend>,
}

impl SeriesRow {
    /// Create a row with every derived column undefined.
    pub fn new(
        source_index: usize,
        time: Timestamp,
        price: f64,
        extra: BTreeMap<String, RawValue>,
    ) -> Self {
        Self {
            source_index,
            time,
            price,
            extra,
            return_step: None,
            return_cumulative: None,
            ma_short: None,
            ma_long: None,
            volatility_short: None,
            crossover_state: None,
            crossover_delta: None,
            bias: None,
            trend: None,
        }
    }

    /// Convert to a fully-defined row, or `None` if any derived value is undefined.
    pub fn to_indicator_row(&self) -> Option<IndicatorRow> {
        Some(IndicatorRow {
            time: self.time,
            price: self.price,
            return_step: self.return_step?,
            return_cumulative: self.return_cumulative?,
            ma_short: self.ma_short?,
            ma_long: self.ma_long?,
            volatility_short: self.volatility_short?,
            crossover_state: self.crossover_state?,
            crossover_delta: self.crossover_delta?,
            bias: self.bias?,
            trend: self.trend?,
            extra: self.extra.clone(),
        })
    }
}

/// Working table owned by one pipeline run and extended stage by stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    rows: Vec<SeriesRow>,
}

impl Series {
    /// Wrap rows that are already in time order.
    pub fn new(rows: Vec<SeriesRow>) -> Self {
        Self { rows }
    }

    /// Get the rows.
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Get the rows for in-place column updates.
    pub fn rows_mut(&mut self) -> &mut [SeriesRow] {
        &mut self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over prices in row order.
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.price)
    }
}

/// A finalized row: every indicator is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub time: Timestamp,
    pub price: f64,
    pub return_step: f64,
    pub return_cumulative: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub volatility_short: f64,
    pub crossover_state: bool,
    pub crossover_delta: i8,
    pub bias: Bias,
    pub trend: Trend,
    /// Pass-through input columns.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, RawValue>,
}

/// Dense, re-indexed pipeline output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorTable {
    rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    /// Wrap finalized rows; row `i` is output index `i`.
    pub fn new(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    /// Get the rows.
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Iterate over rows in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, IndicatorRow> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest row.
    pub fn first(&self) -> Option<&IndicatorRow> {
        self.rows.first()
    }

    /// Latest row.
    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Serialize the table as a JSON array of row objects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'a> IntoIterator for &'a IndicatorTable {
    type Item = &'a IndicatorRow;
    type IntoIter = std::slice::Iter<'a, IndicatorRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
