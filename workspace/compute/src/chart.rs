//! Chart builders: derived table plus channel mapping in, chart spec out.

use common::{
    CategoryPoint, ChartData, ChartKind, ChartOptions, ChartSpec, Encoding, GeoPoint, Series,
    SelectionState, TimePoint,
};

use crate::error::{ComputeError, Result};
use crate::table::{DerivedTable, TableFamily};

/// Whether a chart of `kind` can draw a table of `family`.
pub fn kind_accepts(kind: ChartKind, family: TableFamily) -> bool {
    matches!(
        (kind, family),
        (ChartKind::Bar | ChartKind::Pie, TableFamily::Categories)
            | (ChartKind::Line, TableFamily::TimeSeries)
            | (ChartKind::Heatmap, TableFamily::Correlation)
            | (ChartKind::Histogram, TableFamily::Histogram)
            | (ChartKind::ScatterGeo, TableFamily::Geo)
    )
}

/// Interpolates the selection into a title template.
///
/// Known placeholders: `{measure}`, `{start}` and `{end}`. Without a date
/// range the date placeholders become `all dates`.
pub fn render_title(template: &str, selection: &SelectionState) -> String {
    let (start, end) = match selection.date_range {
        Some(range) => (
            range.start.format("%b %Y").to_string(),
            range.end.format("%b %Y").to_string(),
        ),
        None => ("all dates".to_string(), "all dates".to_string()),
    };
    template
        .replace("{measure}", selection.measure_label())
        .replace("{start}", &start)
        .replace("{end}", &end)
}

/// Everything a builder needs besides the table.
#[derive(Debug, Clone, Copy)]
pub struct ChartLayout<'a> {
    pub id: &'a str,
    pub kind: ChartKind,
    pub title: &'a str,
    pub encoding: &'a Encoding,
    pub options: &'a ChartOptions,
}

/// Builds a chart spec from a derived table.
///
/// Pure: the table is only read and the result depends on nothing else.
pub fn build_chart(
    table: &DerivedTable,
    layout: ChartLayout<'_>,
    selection: &SelectionState,
) -> Result<ChartSpec> {
    if !kind_accepts(layout.kind, table.family()) {
        return Err(ComputeError::Registry(format!(
            "chart {} of kind {:?} cannot draw a {:?} table",
            layout.id,
            layout.kind,
            table.family()
        )));
    }

    let data = match table {
        DerivedTable::Categories(totals) => ChartData::Categories {
            points: totals
                .rows
                .iter()
                .map(|row| CategoryPoint {
                    label: row.label.clone(),
                    value: row.value as f64,
                })
                .collect(),
        },
        DerivedTable::TimeSeries(table) => ChartData::Series {
            series: table
                .series
                .iter()
                .map(|series| Series {
                    name: series.name.clone(),
                    role: series.role,
                    points: series
                        .points
                        .iter()
                        .map(|(date, value)| match value {
                            Some(v) => TimePoint::new(*date, *v),
                            None => TimePoint::gap(*date),
                        })
                        .collect(),
                })
                .collect(),
        },
        DerivedTable::Correlation(matrix) => ChartData::Matrix {
            labels: matrix.labels.clone(),
            cells: matrix.cells.clone(),
        },
        DerivedTable::Histogram(histogram) => ChartData::Bins {
            bins: histogram.bins.clone(),
        },
        DerivedTable::Geo(geo) => ChartData::Geo {
            points: geo
                .rows
                .iter()
                .map(|row| GeoPoint {
                    latitude: row.latitude,
                    longitude: row.longitude,
                    size: row.value as f64,
                    color: row.border.clone(),
                    label: row.port_name.clone(),
                })
                .collect(),
        },
    };

    Ok(ChartSpec {
        id: layout.id.to_string(),
        kind: layout.kind,
        title: render_title(layout.title, selection),
        encoding: layout.encoding.clone(),
        options: layout.options.clone(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CategoryTotal, CategoryTotals, Histogram};
    use chrono::NaiveDate;
    use common::DateRange;

    fn layout<'a>(kind: ChartKind, encoding: &'a Encoding, options: &'a ChartOptions) -> ChartLayout<'a> {
        ChartLayout {
            id: "test",
            kind,
            title: "Total Border Crossings for {measure}",
            encoding,
            options,
        }
    }

    #[test]
    fn test_title_interpolates_selection() {
        let mut selection = SelectionState::for_measure("Trucks");
        assert_eq!(render_title("Trends of {measure}", &selection), "Trends of Trucks");

        selection.date_range = Some(DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        ));
        assert_eq!(
            render_title("{measure} {start} to {end}", &selection),
            "Trucks Jan 2020 to Jun 2020"
        );
    }

    #[test]
    fn test_bar_chart_maps_category_rows() {
        let table = DerivedTable::Categories(CategoryTotals::new(
            "State",
            vec![CategoryTotal {
                label: "Texas".to_string(),
                value: 50,
            }],
        ));
        let encoding = Encoding::xy("Value", "State").with_color("State");
        let options = ChartOptions::default();
        let selection = SelectionState::for_measure("Personal Vehicles");

        let spec = build_chart(&table, layout(ChartKind::Bar, &encoding, &options), &selection).unwrap();
        assert_eq!(spec.title, "Total Border Crossings for Personal Vehicles");
        assert_eq!(spec.encoding, encoding);
        match spec.data {
            ChartData::Categories { points } => {
                assert_eq!(points.len(), 1);
                assert_eq!(points[0].label, "Texas");
                assert_eq!(points[0].value, 50.0);
            }
            other => panic!("unexpected data {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_kind_is_rejected() {
        let table = DerivedTable::Histogram(Histogram::default());
        let encoding = Encoding::default();
        let options = ChartOptions::default();
        let result = build_chart(
            &table,
            layout(ChartKind::Pie, &encoding, &options),
            &SelectionState::default(),
        );
        assert!(matches!(result, Err(ComputeError::Registry(_))));
    }

    #[test]
    fn test_empty_table_gives_empty_spec() {
        let table = DerivedTable::Categories(CategoryTotals::new("State", vec![]));
        let encoding = Encoding::default();
        let options = ChartOptions::default();
        let spec = build_chart(
            &table,
            layout(ChartKind::Bar, &encoding, &options),
            &SelectionState::for_measure("Hovercraft"),
        )
        .unwrap();
        assert!(spec.data.is_empty());
    }
}
