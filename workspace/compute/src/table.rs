//! Derived tables: the ephemeral results of the filter/aggregate pass.
//!
//! They are plain Rust values. [`DerivedTable::to_dataframe`] turns any of
//! them into a polars `DataFrame` for inspection and export.

use chrono::NaiveDate;
use common::{HistogramBin, SeriesRole};
use polars::prelude::*;

use crate::error::Result;

/// Family of a derived table, used to check which chart kinds can draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFamily {
    Categories,
    TimeSeries,
    Correlation,
    Histogram,
    Geo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub label: String,
    pub value: u64,
}

/// Sum of Value per category label, e.g. per State.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotals {
    /// Name of the grouping column
    pub dimension: String,
    pub rows: Vec<CategoryTotal>,
}

impl CategoryTotals {
    pub fn new(dimension: &str, rows: Vec<CategoryTotal>) -> Self {
        Self {
            dimension: dimension.to_string(),
            rows,
        }
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub role: SeriesRole,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl NamedSeries {
    pub fn new(name: &str, role: SeriesRole, points: Vec<(NaiveDate, Option<f64>)>) -> Self {
        Self {
            name: name.to_string(),
            role,
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesTable {
    pub series: Vec<NamedSeries>,
}

impl TimeSeriesTable {
    pub fn series_with_role(&self, role: SeriesRole) -> Option<&NamedSeries> {
        self.series.iter().find(|s| s.role == role)
    }
}

/// Square matrix of pairwise Pearson correlations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == column)?;
        self.cells[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    pub port_name: String,
    pub border: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoTable {
    pub rows: Vec<GeoRow>,
}

/// Any table an aggregate can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedTable {
    Categories(CategoryTotals),
    TimeSeries(TimeSeriesTable),
    Correlation(CorrelationMatrix),
    Histogram(Histogram),
    Geo(GeoTable),
}

impl DerivedTable {
    pub fn family(&self) -> TableFamily {
        match self {
            DerivedTable::Categories(_) => TableFamily::Categories,
            DerivedTable::TimeSeries(_) => TableFamily::TimeSeries,
            DerivedTable::Correlation(_) => TableFamily::Correlation,
            DerivedTable::Histogram(_) => TableFamily::Histogram,
            DerivedTable::Geo(_) => TableFamily::Geo,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DerivedTable::Categories(t) => t.rows.is_empty(),
            DerivedTable::TimeSeries(t) => t.series.iter().all(|s| s.points.is_empty()),
            DerivedTable::Correlation(t) => t.labels.is_empty(),
            DerivedTable::Histogram(t) => t.bins.is_empty(),
            DerivedTable::Geo(t) => t.rows.is_empty(),
        }
    }

    /// Converts the table into a polars DataFrame.
    ///
    /// Time series are emitted in long format: one row per (series, date).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = match self {
            DerivedTable::Categories(t) => {
                let labels: Vec<&str> = t.rows.iter().map(|r| r.label.as_str()).collect();
                let values: Vec<u64> = t.rows.iter().map(|r| r.value).collect();
                DataFrame::new(vec![
                    Series::new(t.dimension.as_str().into(), labels).into(),
                    Series::new("Value".into(), values).into(),
                ])?
            }
            DerivedTable::TimeSeries(t) => {
                let mut names = Vec::new();
                let mut roles = Vec::new();
                let mut dates = Vec::new();
                let mut values = Vec::new();
                for series in &t.series {
                    for (date, value) in &series.points {
                        names.push(series.name.clone());
                        roles.push(role_name(series.role));
                        dates.push(*date);
                        values.push(*value);
                    }
                }
                DataFrame::new(vec![
                    Series::new("series".into(), names).into(),
                    Series::new("role".into(), roles).into(),
                    Series::new("date".into(), dates).into(),
                    Series::new("value".into(), values).into(),
                ])?
            }
            DerivedTable::Correlation(t) => {
                let mut columns: Vec<Column> =
                    vec![Series::new("column".into(), t.labels.clone()).into()];
                for (j, label) in t.labels.iter().enumerate() {
                    let values: Vec<Option<f64>> = t.cells.iter().map(|row| row[j]).collect();
                    columns.push(Series::new(label.as_str().into(), values).into());
                }
                DataFrame::new(columns)?
            }
            DerivedTable::Histogram(t) => {
                let starts: Vec<f64> = t.bins.iter().map(|b| b.start).collect();
                let ends: Vec<f64> = t.bins.iter().map(|b| b.end).collect();
                let counts: Vec<u64> = t.bins.iter().map(|b| b.count).collect();
                DataFrame::new(vec![
                    Series::new("start".into(), starts).into(),
                    Series::new("end".into(), ends).into(),
                    Series::new("count".into(), counts).into(),
                ])?
            }
            DerivedTable::Geo(t) => {
                let ports: Vec<&str> = t.rows.iter().map(|r| r.port_name.as_str()).collect();
                let borders: Vec<&str> = t.rows.iter().map(|r| r.border.as_str()).collect();
                let latitudes: Vec<f64> = t.rows.iter().map(|r| r.latitude).collect();
                let longitudes: Vec<f64> = t.rows.iter().map(|r| r.longitude).collect();
                let values: Vec<u64> = t.rows.iter().map(|r| r.value).collect();
                DataFrame::new(vec![
                    Series::new("Port Name".into(), ports).into(),
                    Series::new("Border".into(), borders).into(),
                    Series::new("Latitude".into(), latitudes).into(),
                    Series::new("Longitude".into(), longitudes).into(),
                    Series::new("Value".into(), values).into(),
                ])?
            }
        };
        Ok(df)
    }
}

fn role_name(role: SeriesRole) -> &'static str {
    match role {
        SeriesRole::Observed => "observed",
        SeriesRole::MovingAverage => "moving_average",
        SeriesRole::Forecast => "forecast",
    }
}
