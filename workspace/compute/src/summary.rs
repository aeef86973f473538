use common::{DatasetSummary, ValueStats};
use model::Dataset;
use tracing::instrument;

/// Linear-interpolation quantile of an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Describe-style statistics over a set of values.
pub fn describe(values: &[f64]) -> ValueStats {
    let count = values.len();
    if count == 0 {
        return ValueStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    ValueStats {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Missing-value counts and Value statistics of a loaded dataset.
#[instrument(skip(dataset))]
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let values: Vec<f64> = dataset.records().iter().map(|r| r.value() as f64).collect();
    DatasetSummary {
        rows: dataset.len(),
        columns: dataset.columns().to_vec(),
        missing: dataset.missing().clone(),
        measures: dataset.measures(),
        value: describe(&values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    #[test]
    fn test_describe_matches_pandas() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.q25, Some(1.75));
        assert_eq!(stats.median, Some(2.5));
        assert_eq!(stats.q75, Some(3.25));
        assert!((stats.std.unwrap() - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let stats = describe(&[7.0]);
        assert_eq!(stats.std, None);
        assert_eq!(stats.min, Some(7.0));
        assert_eq!(stats.max, Some(7.0));
    }

    #[test]
    fn test_describe_empty() {
        assert_eq!(describe(&[]), ValueStats::default());
    }

    #[test]
    fn test_summary_reports_missing_dates() {
        let summary = summarize(&sample_dataset());
        assert_eq!(summary.rows, 13);
        assert_eq!(summary.missing.get("Date"), Some(&1));
        assert_eq!(summary.missing.get("Year"), Some(&1));
        assert_eq!(summary.measures[0], "Trucks");
        assert_eq!(summary.value.count, 13);
    }
}
