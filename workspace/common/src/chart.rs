//! Declarative chart specifications.
//!
//! A [`ChartSpec`] carries everything a renderer needs: the chart kind, the
//! mapping of data columns to visual channels, a title and the derived data
//! points. It holds no reference to the dataset it was built from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of chart a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Heatmap,
    Histogram,
    ScatterGeo,
}

/// Assignment of derived columns to visual channels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct Encoding {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub hover: Option<String>,
}

impl Encoding {
    pub fn xy(x: &str, y: &str) -> Self {
        Self {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn with_hover(mut self, hover: &str) -> Self {
        self.hover = Some(hover.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

fn default_template() -> String {
    "plotly_white".to_string()
}

/// Presentation hints passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartOptions {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub color_scale: Option<String>,
    #[serde(default = "default_template")]
    pub template: String,
    /// Draw point markers on line charts
    #[serde(default)]
    pub markers: bool,
    /// Initial map zoom for geospatial charts
    #[serde(default)]
    pub zoom: Option<u8>,
    #[serde(default)]
    pub map_style: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            color_scale: None,
            template: default_template(),
            markers: false,
            zoom: None,
            map_style: None,
        }
    }
}

/// One labelled value, used by bar and pie charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryPoint {
    pub label: String,
    pub value: f64,
}

/// What a line series represents. Renderers draw each role differently so
/// that observed and forecast points are never confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Observed,
    MovingAverage,
    Forecast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimePoint {
    pub date: NaiveDate,
    /// `None` marks padding in a parallel forecast series
    pub value: Option<f64>,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value: Some(value),
        }
    }

    pub fn gap(date: NaiveDate) -> Self {
        Self { date, value: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Series {
    pub name: String,
    pub role: SeriesRole,
    pub points: Vec<TimePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistogramBin {
    /// Lower edge, inclusive
    pub start: f64,
    /// Upper edge, exclusive except for the last bin
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub size: f64,
    pub color: String,
    pub label: String,
}

/// Data points of a chart, shaped by chart family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Categories { points: Vec<CategoryPoint> },
    Series { series: Vec<Series> },
    Matrix {
        labels: Vec<String>,
        /// Row-major cells, `None` where the correlation is undefined
        cells: Vec<Vec<Option<f64>>>,
    },
    Bins { bins: Vec<HistogramBin> },
    Geo { points: Vec<GeoPoint> },
}

impl ChartData {
    /// True when the chart has nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::Categories { points } => points.is_empty(),
            ChartData::Series { series } => series.iter().all(|s| s.points.is_empty()),
            ChartData::Matrix { labels, .. } => labels.is_empty(),
            ChartData::Bins { bins } => bins.is_empty(),
            ChartData::Geo { points } => points.is_empty(),
        }
    }
}

/// Declarative description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSpec {
    /// Identifier of the chart definition that produced this spec
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub encoding: Encoding,
    pub options: ChartOptions,
    pub data: ChartData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_options_defaults_from_partial_json() {
        let options: ChartOptions = serde_json::from_str(r#"{"markers": true}"#).unwrap();
        assert!(options.markers);
        assert_eq!(options.template, "plotly_white");
        assert_eq!(options.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_empty_series_chart_is_empty() {
        let data = ChartData::Series {
            series: vec![Series {
                name: "Value".to_string(),
                role: SeriesRole::Observed,
                points: vec![],
            }],
        };
        assert!(data.is_empty());
    }

    #[test]
    fn test_chart_data_is_tagged() {
        let data = ChartData::Bins { bins: vec![] };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "bins");
    }
}
