//! Filter/aggregate functions.
//!
//! Each function maps `(dataset, selection)` to a derived table and is
//! independent of its siblings. A selection matching no rows yields an empty
//! table, never an error.

pub mod correlation;
pub mod forecast;
pub mod geo;
pub mod histogram;
pub mod totals;
pub mod trend;

use common::{ControlId, SelectionState};
use model::Dataset;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

pub use forecast::ForecastLayout;
pub use trend::{RollingWindow, TrendGrouping};

use crate::error::{ComputeError, Result};
use crate::forecast::Smoothing;
use crate::table::{DerivedTable, TableFamily};

fn default_top_n() -> usize {
    5
}

fn default_bins() -> usize {
    50
}

fn default_horizon() -> usize {
    12
}

/// Which aggregate a chart runs, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregateSpec {
    /// Value per State, measure and date range applied
    StateTotals,
    /// Value per Border over the whole dataset, no measure filter
    BorderTotals,
    /// Largest `n` ports by Value for the selected measure
    TopPorts {
        #[serde(default = "default_top_n")]
        n: usize,
    },
    /// Monthly Value for the selected measure and range
    Trend {
        #[serde(default)]
        grouping: TrendGrouping,
        #[serde(default)]
        moving_average: Option<RollingWindow>,
    },
    /// Value per date, one series per Border
    BorderSeries,
    /// Pearson correlation of the numeric columns
    Correlation {
        #[serde(default)]
        precision: Option<u32>,
    },
    /// Equal-width histogram of Value
    Histogram {
        #[serde(default = "default_bins")]
        bins: usize,
    },
    /// Port coordinates sized by Value
    Geo,
    /// Monthly Value extended by a Holt linear forecast
    Forecast {
        #[serde(default = "default_horizon")]
        horizon: usize,
        #[serde(default)]
        layout: ForecastLayout,
        #[serde(default)]
        smoothing: Smoothing,
    },
}

impl AggregateSpec {
    /// Controls whose value this aggregate reads.
    pub fn reads(&self) -> &'static [ControlId] {
        match self {
            AggregateSpec::StateTotals
            | AggregateSpec::Trend { .. }
            | AggregateSpec::BorderSeries => &[ControlId::Measure, ControlId::DateRange],
            AggregateSpec::TopPorts { .. }
            | AggregateSpec::Histogram { .. }
            | AggregateSpec::Geo
            | AggregateSpec::Forecast { .. } => &[ControlId::Measure],
            AggregateSpec::BorderTotals | AggregateSpec::Correlation { .. } => &[],
        }
    }

    /// Family of the table this aggregate produces.
    pub fn family(&self) -> TableFamily {
        match self {
            AggregateSpec::StateTotals
            | AggregateSpec::BorderTotals
            | AggregateSpec::TopPorts { .. } => TableFamily::Categories,
            AggregateSpec::Trend { .. }
            | AggregateSpec::BorderSeries
            | AggregateSpec::Forecast { .. } => TableFamily::TimeSeries,
            AggregateSpec::Correlation { .. } => TableFamily::Correlation,
            AggregateSpec::Histogram { .. } => TableFamily::Histogram,
            AggregateSpec::Geo => TableFamily::Geo,
        }
    }

    /// Checks the parameters once, when the chart is registered.
    pub fn validate(&self) -> Result<()> {
        match self {
            AggregateSpec::Trend {
                moving_average: Some(rolling),
                ..
            } if rolling.window == 0
                || rolling.min_periods == 0
                || rolling.min_periods > rolling.window =>
            {
                Err(ComputeError::Registry(format!(
                    "moving average needs 1 <= min_periods <= window, got window={} min_periods={}",
                    rolling.window, rolling.min_periods
                )))
            }
            AggregateSpec::Histogram { bins: 0 } => {
                Err(ComputeError::Registry("histogram needs at least one bin".to_string()))
            }
            AggregateSpec::Forecast { horizon: 0, .. } => {
                Err(ComputeError::Registry("forecast horizon must be positive".to_string()))
            }
            AggregateSpec::Correlation {
                precision: Some(p),
            } if *p > 15 => Err(ComputeError::Registry(format!(
                "correlation precision {} exceeds f64 resolution",
                p
            ))),
            _ => Ok(()),
        }
    }

    /// Runs the aggregate against the dataset.
    #[instrument(skip(dataset), fields(rows = dataset.len()))]
    pub fn run(&self, dataset: &Dataset, selection: &SelectionState) -> Result<DerivedTable> {
        trace!("Running aggregate");
        let table = match self {
            AggregateSpec::StateTotals => {
                DerivedTable::Categories(totals::state_totals(dataset, selection))
            }
            AggregateSpec::BorderTotals => DerivedTable::Categories(totals::border_totals(dataset)),
            AggregateSpec::TopPorts { n } => {
                DerivedTable::Categories(totals::top_ports(dataset, selection, *n))
            }
            AggregateSpec::Trend {
                grouping,
                moving_average,
            } => DerivedTable::TimeSeries(trend::trend(
                dataset,
                selection,
                *grouping,
                *moving_average,
            )),
            AggregateSpec::BorderSeries => {
                DerivedTable::TimeSeries(trend::border_series(dataset, selection))
            }
            AggregateSpec::Correlation { precision } => {
                DerivedTable::Correlation(correlation::correlation_matrix(dataset, *precision))
            }
            AggregateSpec::Histogram { bins } => {
                DerivedTable::Histogram(histogram::value_histogram(dataset, selection, *bins))
            }
            AggregateSpec::Geo => DerivedTable::Geo(geo::geo_points(dataset, selection)),
            AggregateSpec::Forecast {
                horizon,
                layout,
                smoothing,
            } => DerivedTable::TimeSeries(forecast::forecast_extension(
                dataset, selection, *horizon, *layout, *smoothing,
            )),
        };
        Ok(table)
    }
}
