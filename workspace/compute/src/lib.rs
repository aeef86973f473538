pub mod aggregate;
pub mod binding;
pub mod chart;
pub mod error;
pub mod filter;
pub mod forecast;
pub mod registry;
pub mod summary;
pub mod table;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use binding::Dashboard;
use model::Dataset;
use registry::ChartRegistry;

/// Returns a dashboard wired with the standard chart registry, which is what
/// most callers want.
///
/// Every chart is rendered once before this returns.
pub fn default_dashboard(dataset: Arc<Dataset>) -> error::Result<Dashboard> {
    Dashboard::new(dataset, Arc::new(ChartRegistry::standard()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::two_row_dataset;
    use common::ChartData;

    #[test]
    fn test_default_dashboard_two_row_scenario() {
        let dashboard = default_dashboard(Arc::new(two_row_dataset())).unwrap();
        let spec = dashboard.chart("state-totals").unwrap();

        assert_eq!(spec.title, "Total Border Crossings for Personal Vehicles");
        match &spec.data {
            ChartData::Categories { points } => {
                let total: f64 = points.iter().map(|p| p.value).sum();
                assert_eq!(total, 80.0);
                assert_eq!(points.len(), 2);
            }
            other => panic!("unexpected chart data {:?}", other),
        }
    }
}
