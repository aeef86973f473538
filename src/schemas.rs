use chrono::NaiveDate;
use common::{
    CategoryPoint, ChartData, ChartKind, ChartOptions, ChartSpec, ControlChange,
    ControlDescriptor, ControlId, DatasetSummary, DateRange, Encoding, GeoPoint, HistogramBin,
    Orientation, SelectionState, Series, SeriesRole, TimePoint, ValueStats,
};
use compute::binding::Dashboard;
use compute::registry::ChartRegistry;
use model::Dataset;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The live dashboard; events are applied one at a time through the lock
    pub dashboard: Arc<Mutex<Dashboard>>,
    /// Loaded dataset, shared read-only
    pub dataset: Arc<Dataset>,
    /// Chart definitions
    pub registry: Arc<ChartRegistry>,
    /// Cache of chart previews keyed by chart id and selection
    pub cache: Cache<String, ChartSpec>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("records", &self.dataset.len())
            .field("charts", &self.registry.charts().len())
            .field("cached_previews", &self.cache.entry_count())
            .finish()
    }
}

/// Query parameters of the chart preview endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ChartQuery {
    /// Measure to build the chart for (defaults to the first measure)
    #[validate(length(min = 1, max = 200))]
    pub measure: Option<String>,
    /// First month included (YYYY-MM-DD)
    pub start_date: Option<NaiveDate>,
    /// Last month included (YYYY-MM-DD)
    pub end_date: Option<NaiveDate>,
}

/// A user action: one or more control changes applied together
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct EventRequest {
    #[validate(length(min = 1, max = 16))]
    pub changes: Vec<ControlChange>,
}

/// Outcome of a user action
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EventResponse {
    /// Selection after the action
    pub selection: SelectionState,
    /// Charts rebuilt by the action, in dashboard order
    pub charts: Vec<ChartSpec>,
}

/// Controls with the current selection
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ControlsResponse {
    pub controls: Vec<ControlDescriptor>,
    pub selection: SelectionState,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            success: false,
        }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Number of loaded records
    pub records: usize,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::dataset::get_dataset_summary,
        crate::handlers::controls::get_controls,
        crate::handlers::charts::get_charts,
        crate::handlers::charts::get_chart,
        crate::handlers::charts::preview_chart,
        crate::handlers::events::post_event,
    ),
    components(
        schemas(
            ApiResponse<ChartSpec>,
            ApiResponse<Vec<ChartSpec>>,
            ApiResponse<ControlsResponse>,
            ApiResponse<EventResponse>,
            ApiResponse<DatasetSummary>,
            ErrorResponse,
            HealthResponse,
            ChartQuery,
            EventRequest,
            EventResponse,
            ControlsResponse,
            ChartSpec,
            ChartKind,
            ChartData,
            ChartOptions,
            Encoding,
            Orientation,
            CategoryPoint,
            Series,
            SeriesRole,
            TimePoint,
            HistogramBin,
            GeoPoint,
            ControlChange,
            ControlDescriptor,
            ControlId,
            DateRange,
            SelectionState,
            DatasetSummary,
            ValueStats,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dataset", description = "Loaded dataset endpoints"),
        (name = "controls", description = "Dashboard control endpoints"),
        (name = "charts", description = "Chart specification endpoints"),
        (name = "events", description = "User action endpoints"),
    ),
    info(
        title = "Borderflow API",
        description = "Border crossing dashboard API - chart specifications that follow the selected measure and date range",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
