//! Common transport-layer types shared between the compute engine, the HTTP
//! server and whatever renders the charts.
//! Every type here is plain serializable data with no reference to the
//! loaded dataset.

mod chart;
mod selection;
mod summary;

pub use chart::{
    CategoryPoint, ChartData, ChartKind, ChartOptions, ChartSpec, Encoding, GeoPoint,
    HistogramBin, Orientation, Series, SeriesRole, TimePoint,
};
pub use selection::{ControlChange, ControlDescriptor, ControlId, DateRange, SelectionState};
pub use summary::{DatasetSummary, ValueStats};
