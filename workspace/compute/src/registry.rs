//! Chart registry: which charts exist, what they compute and which controls
//! trigger them. This is configuration data, not code; the file-based config
//! can replace the standard set wholesale.

use common::{ChartKind, ChartOptions, ChartSpec, ControlId, Encoding, Orientation, SelectionState};
use model::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

use crate::aggregate::{AggregateSpec, ForecastLayout, RollingWindow, TrendGrouping};
use crate::chart::{ChartLayout, build_chart, kind_accepts};
use crate::error::{ComputeError, Result};
use crate::forecast::Smoothing;

/// One chart on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub id: String,
    pub kind: ChartKind,
    /// Title template, see [`crate::chart::render_title`]
    pub title: String,
    pub aggregate: AggregateSpec,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub options: ChartOptions,
    /// Controls whose change recomputes this chart. Left empty, it defaults
    /// to the enabled controls the aggregate reads.
    #[serde(default)]
    pub triggers: Vec<ControlId>,
}

impl ChartDefinition {
    pub fn new(id: &str, kind: ChartKind, title: &str, aggregate: AggregateSpec) -> Self {
        let triggers = aggregate.reads().to_vec();
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            aggregate,
            encoding: Encoding::default(),
            options: ChartOptions::default(),
            triggers,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_triggers(mut self, triggers: &[ControlId]) -> Self {
        self.triggers = triggers.to_vec();
        self
    }

    pub fn is_triggered_by(&self, control: ControlId) -> bool {
        self.triggers.contains(&control)
    }

    /// Title template with the aggregate parameters filled in: `{n}` for
    /// top ports, `{bins}` for histograms and `{horizon}` for forecasts.
    pub fn title_template(&self) -> String {
        match &self.aggregate {
            AggregateSpec::TopPorts { n } => self.title.replace("{n}", &n.to_string()),
            AggregateSpec::Histogram { bins } => self.title.replace("{bins}", &bins.to_string()),
            AggregateSpec::Forecast { horizon, .. } => {
                self.title.replace("{horizon}", &horizon.to_string())
            }
            _ => self.title.clone(),
        }
    }

    /// Runs the aggregate and the builder for this chart.
    #[instrument(skip(self, dataset), fields(chart = %self.id))]
    pub fn build(&self, dataset: &Dataset, selection: &SelectionState) -> Result<ChartSpec> {
        let table = self.aggregate.run(dataset, selection)?;
        debug!("Chart {} derived table empty: {}", self.id, table.is_empty());

        let title = self.title_template();
        let layout = ChartLayout {
            id: &self.id,
            kind: self.kind,
            title: &title,
            encoding: &self.encoding,
            options: &self.options,
        };
        build_chart(&table, layout, selection)
    }
}

/// The validated set of controls and charts a dashboard is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRegistry {
    controls: Vec<ControlId>,
    charts: Vec<ChartDefinition>,
}

impl ChartRegistry {
    /// Validates and assembles a registry.
    pub fn new(controls: Vec<ControlId>, charts: Vec<ChartDefinition>) -> Result<Self> {
        let mut seen_controls = HashSet::new();
        for control in &controls {
            if !seen_controls.insert(*control) {
                return Err(ComputeError::Registry(format!(
                    "control {} listed twice",
                    control
                )));
            }
        }

        let mut seen_ids = HashSet::new();
        let mut validated = Vec::with_capacity(charts.len());
        for mut chart in charts {
            if chart.id.trim().is_empty() {
                return Err(ComputeError::Registry("chart id must not be empty".to_string()));
            }
            if !seen_ids.insert(chart.id.clone()) {
                return Err(ComputeError::Registry(format!("duplicate chart id {}", chart.id)));
            }
            if !kind_accepts(chart.kind, chart.aggregate.family()) {
                return Err(ComputeError::Registry(format!(
                    "chart {} of kind {:?} cannot draw a {:?} table",
                    chart.id,
                    chart.kind,
                    chart.aggregate.family()
                )));
            }
            chart.aggregate.validate()?;

            if chart.triggers.is_empty() {
                chart.triggers = chart
                    .aggregate
                    .reads()
                    .iter()
                    .copied()
                    .filter(|c| controls.contains(c))
                    .collect();
            }
            for read in chart.aggregate.reads() {
                if controls.contains(read) && !chart.is_triggered_by(*read) {
                    return Err(ComputeError::Registry(format!(
                        "chart {} reads control {} but is not triggered by it",
                        chart.id, read
                    )));
                }
            }
            for trigger in &chart.triggers {
                if !controls.contains(trigger) {
                    warn!(
                        "Chart {} is triggered by control {} which is not on the dashboard",
                        chart.id, trigger
                    );
                }
            }

            validated.push(chart);
        }

        Ok(Self {
            controls,
            charts: validated,
        })
    }

    /// The standard border-crossing dashboard.
    pub fn standard() -> Self {
        Self {
            controls: Self::default_controls(),
            charts: Self::default_charts(),
        }
    }

    pub fn default_controls() -> Vec<ControlId> {
        vec![ControlId::Measure, ControlId::DateRange]
    }

    pub fn default_charts() -> Vec<ChartDefinition> {
        vec![
            ChartDefinition::new(
                "state-totals",
                ChartKind::Bar,
                "Total Border Crossings for {measure}",
                AggregateSpec::StateTotals,
            )
            .with_encoding(Encoding::xy("Value", "State").with_color("State"))
            .with_options(ChartOptions {
                orientation: Orientation::Horizontal,
                color_scale: Some("viridis".to_string()),
                ..Default::default()
            }),
            ChartDefinition::new(
                "border-time-series",
                ChartKind::Line,
                "Time Series Analysis of {measure}",
                AggregateSpec::BorderSeries,
            )
            .with_encoding(Encoding::xy("Date", "Value").with_color("Border"))
            .with_options(ChartOptions {
                markers: true,
                ..Default::default()
            }),
            // Registered on the measure dropdown even though the matrix ignores it.
            ChartDefinition::new(
                "correlation-heatmap",
                ChartKind::Heatmap,
                "Correlation Matrix",
                AggregateSpec::Correlation { precision: Some(3) },
            )
            .with_triggers(&[ControlId::Measure])
            .with_options(ChartOptions {
                color_scale: Some("coolwarm".to_string()),
                ..Default::default()
            }),
            ChartDefinition::new(
                "geospatial",
                ChartKind::ScatterGeo,
                "Geospatial Analysis for {measure}",
                AggregateSpec::Geo,
            )
            .with_encoding(
                Encoding::xy("Longitude", "Latitude")
                    .with_size("Value")
                    .with_color("Border")
                    .with_hover("Port Name"),
            )
            .with_options(ChartOptions {
                zoom: Some(3),
                map_style: Some("carto-positron".to_string()),
                ..Default::default()
            }),
            ChartDefinition::new(
                "border-share",
                ChartKind::Pie,
                "Border Crossing Share by Border",
                AggregateSpec::BorderTotals,
            )
            .with_triggers(&[ControlId::Measure])
            .with_encoding(Encoding {
                color: Some("Border".to_string()),
                size: Some("Value".to_string()),
                ..Default::default()
            }),
            ChartDefinition::new(
                "top-ports",
                ChartKind::Bar,
                "Top {n} Ports for {measure}",
                AggregateSpec::TopPorts { n: 5 },
            )
            .with_encoding(Encoding::xy("Port Name", "Value").with_color("Port Name")),
            ChartDefinition::new(
                "monthly-trend",
                ChartKind::Line,
                "Monthly Trend of {measure} ({start} - {end})",
                AggregateSpec::Trend {
                    grouping: TrendGrouping::MonthYear,
                    moving_average: Some(RollingWindow::default()),
                },
            )
            .with_encoding(Encoding::xy("Date", "Value"))
            .with_options(ChartOptions {
                markers: true,
                ..Default::default()
            }),
            ChartDefinition::new(
                "value-distribution",
                ChartKind::Histogram,
                "Distribution of {measure} Values",
                AggregateSpec::Histogram { bins: 50 },
            )
            .with_encoding(Encoding {
                x: Some("Value".to_string()),
                ..Default::default()
            }),
            ChartDefinition::new(
                "forecast",
                ChartKind::Line,
                "Forecast of {measure}",
                AggregateSpec::Forecast {
                    horizon: 12,
                    layout: ForecastLayout::Appended,
                    smoothing: Smoothing::Optimized,
                },
            )
            .with_encoding(Encoding::xy("Date", "Value")),
        ]
    }

    pub fn controls(&self) -> &[ControlId] {
        &self.controls
    }

    pub fn has_control(&self, control: ControlId) -> bool {
        self.controls.contains(&control)
    }

    /// Charts in registration order.
    pub fn charts(&self) -> &[ChartDefinition] {
        &self.charts
    }

    pub fn get(&self, id: &str) -> Option<&ChartDefinition> {
        self.charts.iter().find(|c| c.id == id)
    }
}
