use common::{HistogramBin, SelectionState};
use model::{Dataset, Record};

use crate::filter::measure_rows;
use crate::table::Histogram;

/// Buckets `values` into `bins` equal-width bins spanning their min and max.
///
/// Every bin is half-open except the last, which also holds the maximum.
/// A single distinct value gets a unit-wide span centred on it.
pub fn equal_width_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let Some((mut low, mut high)) = values.iter().fold(None, |acc: Option<(f64, f64)>, v| {
        Some(match acc {
            None => (*v, *v),
            Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
        })
    }) else {
        return Vec::new();
    };

    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0u64; bins];
    for value in values {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: low + i as f64 * width,
            end: if i + 1 == bins {
                high
            } else {
                low + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Histogram of Value for the selected measure.
pub fn value_histogram(dataset: &Dataset, selection: &SelectionState, bins: usize) -> Histogram {
    let values: Vec<f64> = measure_rows(dataset, selection)
        .map(Record::value)
        .map(|v| v as f64)
        .collect();
    Histogram {
        bins: equal_width_bins(&values, bins),
    }
}
