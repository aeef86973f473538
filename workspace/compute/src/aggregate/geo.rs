use common::SelectionState;
use model::Dataset;

use crate::filter::measure_rows;
use crate::table::{GeoRow, GeoTable};

/// Rows of the selected measure that carry both coordinates, in dataset order.
pub fn geo_points(dataset: &Dataset, selection: &SelectionState) -> GeoTable {
    GeoTable {
        rows: measure_rows(dataset, selection)
            .filter_map(|record| {
                let (latitude, longitude) = record.coordinates()?;
                Some(GeoRow {
                    port_name: record.port_name().to_string(),
                    border: record.border().to_string(),
                    latitude,
                    longitude,
                    value: record.value(),
                })
            })
            .collect(),
    }
}
