use chrono::{Datelike, NaiveDate};
use common::{SelectionState, SeriesRole};
use model::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::selected_rows;
use crate::table::{NamedSeries, TimeSeriesTable};

/// How a trend groups the selected rows along time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendGrouping {
    /// Group by the derived (Month, Year) pair, chronologically.
    #[default]
    MonthYear,
    /// Group by the Date column itself.
    Date,
}

/// Trailing moving-average parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingWindow {
    pub window: usize,
    #[serde(default = "default_min_periods")]
    pub min_periods: usize,
}

fn default_min_periods() -> usize {
    1
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self {
            window: 6,
            min_periods: 1,
        }
    }
}

/// Trailing mean over at most `window` points.
///
/// A position with fewer than `min_periods` points available yields `None`.
/// The output always has the input's length.
pub fn moving_average(values: &[f64], rolling: RollingWindow) -> Vec<Option<f64>> {
    let window = rolling.window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            if slice.len() >= rolling.min_periods {
                Some(slice.iter().sum::<f64>() / slice.len() as f64)
            } else {
                None
            }
        })
        .collect()
}

/// Value summed per month for the selected measure and range, optionally
/// accompanied by a moving average series.
pub fn trend(
    dataset: &Dataset,
    selection: &SelectionState,
    grouping: TrendGrouping,
    moving: Option<RollingWindow>,
) -> TimeSeriesTable {
    let mut sums: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in selected_rows(dataset, selection) {
        let key = match grouping {
            TrendGrouping::MonthYear => record
                .year()
                .zip(record.month())
                .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)),
            TrendGrouping::Date => record.date(),
        };
        if let Some(key) = key {
            *sums.entry(key).or_insert(0) += record.value();
        }
    }

    let observed: Vec<(NaiveDate, f64)> = sums.into_iter().map(|(d, v)| (d, v as f64)).collect();
    let mut table = TimeSeriesTable {
        series: vec![NamedSeries::new(
            "Value",
            SeriesRole::Observed,
            observed.iter().map(|(d, v)| (*d, Some(*v))).collect(),
        )],
    };

    if let Some(rolling) = moving {
        let values: Vec<f64> = observed.iter().map(|(_, v)| *v).collect();
        let averaged = moving_average(&values, rolling);
        table.series.push(NamedSeries::new(
            "Moving Average",
            SeriesRole::MovingAverage,
            observed.iter().map(|(d, _)| *d).zip(averaged).collect(),
        ));
    }

    table
}

/// One observed series per Border: Value summed per date.
pub fn border_series(dataset: &Dataset, selection: &SelectionState) -> TimeSeriesTable {
    let mut sums: BTreeMap<&str, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for record in selected_rows(dataset, selection) {
        if let Some(date) = record.date() {
            *sums
                .entry(record.border())
                .or_default()
                .entry(date)
                .or_insert(0) += record.value();
        }
    }

    TimeSeriesTable {
        series: sums
            .into_iter()
            .map(|(border, points)| {
                NamedSeries::new(
                    border,
                    SeriesRole::Observed,
                    points.into_iter().map(|(d, v)| (d, Some(v as f64))).collect(),
                )
            })
            .collect(),
    }
}

/// Month that follows `date` by `months`, kept on the first of the month.
pub(crate) fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(chrono::Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    #[test]
    fn test_moving_average_keeps_length_and_first_value() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];
        let averaged = moving_average(&values, RollingWindow::default());

        assert_eq!(averaged.len(), values.len());
        assert_eq!(averaged[0], Some(10.0));
        assert_eq!(averaged[1], Some(15.0));
        // full window from index 5 on
        assert_eq!(averaged[5], Some(35.0));
        assert_eq!(averaged[7], Some(55.0));
    }

    #[test]
    fn test_moving_average_respects_min_periods() {
        let averaged = moving_average(
            &[1.0, 2.0, 3.0],
            RollingWindow {
                window: 3,
                min_periods: 2,
            },
        );
        assert_eq!(averaged, vec![None, Some(1.5), Some(2.0)]);
        assert!(moving_average(&[], RollingWindow::default()).is_empty());
    }

    #[test]
    fn test_trend_groupings_agree_on_monthly_data() {
        let dataset = sample_dataset();
        let selection = SelectionState::for_measure("Trucks");
        let by_month = trend(&dataset, &selection, TrendGrouping::MonthYear, None);
        let by_date = trend(&dataset, &selection, TrendGrouping::Date, None);

        assert_eq!(by_month, by_date);
        let observed = by_month.series_with_role(SeriesRole::Observed).unwrap();
        let dates: Vec<NaiveDate> = observed.points.iter().map(|(d, _)| *d).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_trend_with_moving_average_adds_parallel_series() {
        let dataset = sample_dataset();
        let selection = SelectionState::for_measure("Trucks");
        let table = trend(
            &dataset,
            &selection,
            TrendGrouping::MonthYear,
            Some(RollingWindow::default()),
        );

        let observed = table.series_with_role(SeriesRole::Observed).unwrap();
        let averaged = table.series_with_role(SeriesRole::MovingAverage).unwrap();
        assert_eq!(observed.points.len(), averaged.points.len());
        assert_eq!(observed.points[0], averaged.points[0]);
    }

    #[test]
    fn test_border_series_split_per_border() {
        let dataset = sample_dataset();
        let table = border_series(&dataset, &SelectionState::for_measure("Trucks"));
        let names: Vec<&str> = table.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["US-Canada Border", "US-Mexico Border"]);
    }

    #[test]
    fn test_add_months_crosses_year_boundary() {
        let nov = NaiveDate::from_ymd_opt(2020, 11, 1).unwrap();
        assert_eq!(add_months(nov, 3), NaiveDate::from_ymd_opt(2021, 2, 1));
    }
}
