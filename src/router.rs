use crate::handlers::{
    charts::{get_chart, get_charts, preview_chart},
    controls::get_controls,
    dataset::get_dataset_summary,
    events::post_event,
    health::health_check,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Dataset
        .route("/api/v1/dataset/summary", get(get_dataset_summary))
        // Dashboard
        .route("/api/v1/controls", get(get_controls))
        .route("/api/v1/charts", get(get_charts))
        .route("/api/v1/charts/:chart_id", get(get_chart))
        .route("/api/v1/charts/:chart_id/preview", get(preview_chart))
        .route("/api/v1/events", post(post_event))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
