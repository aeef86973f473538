use model::Dataset;
use tracing::debug;

use crate::table::CorrelationMatrix;

/// Pearson correlation over the pairs where both values are present.
///
/// Returns `None` when fewer than two pairs exist or either side has no
/// variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let den = (sxx * syy).sqrt();
    if den == 0.0 || !den.is_finite() {
        None
    } else {
        Some((sxy / den).clamp(-1.0, 1.0))
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Correlation matrix of every numeric column of the full dataset.
///
/// The selection plays no part here. The diagonal is 1.0 by definition and
/// the matrix is symmetric by construction.
pub fn correlation_matrix(dataset: &Dataset, precision: Option<u32>) -> CorrelationMatrix {
    if dataset.is_empty() {
        return CorrelationMatrix::default();
    }

    let columns = dataset.numeric_columns();
    let values: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|column| dataset.records().iter().map(|r| r.numeric(column)).collect())
        .collect();

    let size = columns.len();
    let mut cells = vec![vec![None; size]; size];
    for i in 0..size {
        cells[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let pairs: Vec<(f64, f64)> = values[i]
                .iter()
                .zip(&values[j])
                .filter_map(|(a, b)| a.zip(*b))
                .collect();
            let corr = pearson(&pairs).map(|c| match precision {
                Some(p) => round_to(c, p),
                None => c,
            });
            cells[i][j] = corr;
            cells[j][i] = corr;
        }
    }

    debug!("Computed {}x{} correlation matrix", size, size);
    CorrelationMatrix {
        labels: columns.into_iter().map(String::from).collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_dataset;

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let up: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let down: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, -(i as f64))).collect();
        assert!((pearson(&up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&down).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[(1.0, 2.0), (1.0, 3.0)]), None);
        assert_eq!(pearson(&[(1.0, 2.0)]), None);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let matrix = correlation_matrix(&sample_dataset(), Some(3));
        assert!(matrix.labels.contains(&"Value".to_string()));
        assert!(matrix.labels.contains(&"Year".to_string()));

        for a in &matrix.labels {
            assert_eq!(matrix.get(a, a), Some(1.0));
            for b in &matrix.labels {
                assert_eq!(matrix.get(a, b), matrix.get(b, a));
            }
        }
    }

    #[test]
    fn test_rounding_to_three_places() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(-0.98765, 3), -0.988);
    }

    #[test]
    fn test_empty_dataset_gives_empty_matrix() {
        let matrix = correlation_matrix(&Dataset::default(), None);
        assert!(matrix.labels.is_empty());
    }
}
