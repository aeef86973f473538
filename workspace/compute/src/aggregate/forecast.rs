use chrono::NaiveDate;
use common::{SelectionState, SeriesRole};
use model::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::trend::add_months;
use crate::filter::measure_rows;
use crate::forecast::{HoltLinear, Smoothing};
use crate::table::{NamedSeries, TimeSeriesTable};

/// How forecast points are laid out next to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastLayout {
    /// Forecast series holds only the future-dated points.
    #[default]
    Appended,
    /// History and forecast share one x-axis spanning past and future;
    /// each series is padded with gaps where the other has values.
    Parallel,
}

/// Value summed per date for the selected measure, extended `horizon` months
/// past the last observation.
///
/// A series the model cannot fit is returned without a forecast series.
pub fn forecast_extension(
    dataset: &Dataset,
    selection: &SelectionState,
    horizon: usize,
    layout: ForecastLayout,
    smoothing: Smoothing,
) -> TimeSeriesTable {
    let mut sums: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in measure_rows(dataset, selection) {
        if let Some(date) = record.date() {
            *sums.entry(date).or_insert(0) += record.value();
        }
    }
    let history: Vec<(NaiveDate, f64)> = sums.into_iter().map(|(d, v)| (d, v as f64)).collect();

    let observed = |extra: &[NaiveDate]| {
        let mut points: Vec<(NaiveDate, Option<f64>)> =
            history.iter().map(|(d, v)| (*d, Some(*v))).collect();
        points.extend(extra.iter().map(|d| (*d, None)));
        NamedSeries::new("Value", SeriesRole::Observed, points)
    };

    let Some(&(last_date, _)) = history.last() else {
        return TimeSeriesTable {
            series: vec![observed(&[])],
        };
    };

    let values: Vec<f64> = history.iter().map(|(_, v)| *v).collect();
    let model = match HoltLinear::fit(&values, smoothing) {
        Ok(model) => model,
        Err(err) => {
            warn!(
                "No forecast for {}: {}",
                selection.measure_label(),
                err
            );
            return TimeSeriesTable {
                series: vec![observed(&[])],
            };
        }
    };

    let future: Vec<(NaiveDate, f64)> = (1..=horizon)
        .filter_map(|step| add_months(last_date, step as u32))
        .zip(model.forecast(horizon))
        .collect();
    let future_dates: Vec<NaiveDate> = future.iter().map(|(d, _)| *d).collect();

    let series = match layout {
        ForecastLayout::Appended => vec![
            observed(&[]),
            NamedSeries::new(
                "Forecast",
                SeriesRole::Forecast,
                future.iter().map(|(d, v)| (*d, Some(*v))).collect(),
            ),
        ],
        ForecastLayout::Parallel => {
            let mut padded: Vec<(NaiveDate, Option<f64>)> =
                history.iter().map(|(d, _)| (*d, None)).collect();
            padded.extend(future.iter().map(|(d, v)| (*d, Some(*v))));
            vec![
                observed(&future_dates),
                NamedSeries::new("Forecast", SeriesRole::Forecast, padded),
            ]
        }
    };

    TimeSeriesTable { series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;
    use model::Record;

    fn linear_dataset() -> Dataset {
        Dataset::from_records(
            [100, 110, 120, 130]
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    Record::new(
                        "US-Canada Border",
                        NaiveDate::from_ymd_opt(2023, i as u32 + 1, 1),
                        "Trucks",
                        "Sumas",
                        "Washington",
                        *v,
                    )
                })
                .collect(),
        )
        .enrich()
    }

    #[test]
    fn test_appended_forecast_continues_monthly() {
        let table = forecast_extension(
            &linear_dataset(),
            &SelectionState::for_measure("Trucks"),
            6,
            ForecastLayout::Appended,
            Smoothing::Optimized,
        );

        let forecast = table.series_with_role(SeriesRole::Forecast).unwrap();
        assert_eq!(forecast.points.len(), 6);
        assert_eq!(forecast.points[0].0, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert_eq!(forecast.points[5].0, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        let first = forecast.points[0].1.unwrap();
        assert!((first - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_forecast_shares_axis() {
        let table = forecast_extension(
            &linear_dataset(),
            &SelectionState::for_measure("Trucks"),
            12,
            ForecastLayout::Parallel,
            Smoothing::Optimized,
        );

        let observed = table.series_with_role(SeriesRole::Observed).unwrap();
        let forecast = table.series_with_role(SeriesRole::Forecast).unwrap();
        assert_eq!(observed.points.len(), 16);
        assert_eq!(forecast.points.len(), 16);
        for (o, f) in observed.points.iter().zip(&forecast.points) {
            assert_eq!(o.0, f.0);
            // never both present at once
            assert!(o.1.is_none() || f.1.is_none());
        }
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let dataset = sample_dataset();
        let selection = SelectionState::for_measure("Trucks");
        let run = || {
            forecast_extension(
                &dataset,
                &selection,
                12,
                ForecastLayout::Appended,
                Smoothing::Optimized,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_single_point_history_has_no_forecast() {
        let dataset = Dataset::from_records(vec![Record::new(
            "US-Canada Border",
            NaiveDate::from_ymd_opt(2023, 1, 1),
            "Trucks",
            "Sumas",
            "Washington",
            9,
        )]);
        let table = forecast_extension(
            &dataset,
            &SelectionState::for_measure("Trucks"),
            6,
            ForecastLayout::Appended,
            Smoothing::Optimized,
        );

        assert_eq!(table.series.len(), 1);
        assert_eq!(table.series[0].points.len(), 1);
        assert!(table.series_with_role(SeriesRole::Forecast).is_none());
    }

    #[test]
    fn test_empty_selection_gives_empty_observed_series() {
        let table = forecast_extension(
            &sample_dataset(),
            &SelectionState::for_measure("Hovercraft"),
            6,
            ForecastLayout::Appended,
            Smoothing::Optimized,
        );
        assert_eq!(table.series.len(), 1);
        assert!(table.series[0].points.is_empty());
    }
}
