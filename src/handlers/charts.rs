use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ChartSpec;
use compute::binding::{explicit_selection, render_chart};
use tracing::{debug, info, instrument, trace};

use crate::handlers::compute_error;
use crate::schemas::{ApiResponse, AppState, ChartQuery, ErrorResponse};

/// Current specs of every chart, in dashboard order
#[utoipa::path(
    get,
    path = "/api/v1/charts",
    tag = "charts",
    responses(
        (status = 200, description = "Charts retrieved successfully", body = ApiResponse<Vec<ChartSpec>>)
    )
)]
#[instrument]
pub async fn get_charts(State(state): State<AppState>) -> Json<ApiResponse<Vec<ChartSpec>>> {
    let dashboard = state.dashboard.lock().await;
    let charts: Vec<ChartSpec> = dashboard.charts().into_iter().cloned().collect();
    debug!("Returning {} charts", charts.len());

    Json(ApiResponse {
        data: charts,
        message: "Charts retrieved successfully".to_string(),
        success: true,
    })
}

/// Current spec of a single chart
#[utoipa::path(
    get,
    path = "/api/v1/charts/{chart_id}",
    tag = "charts",
    params(
        ("chart_id" = String, Path, description = "Chart ID"),
    ),
    responses(
        (status = 200, description = "Chart retrieved successfully", body = ApiResponse<ChartSpec>),
        (status = 404, description = "Chart not found", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_chart(
    Path(chart_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartSpec>>, (StatusCode, Json<ErrorResponse>)> {
    let dashboard = state.dashboard.lock().await;
    match dashboard.chart(&chart_id) {
        Some(spec) => Ok(Json(ApiResponse {
            data: spec.clone(),
            message: "Chart retrieved successfully".to_string(),
            success: true,
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Chart {} not found", chart_id),
                "CHART_NOT_FOUND",
            )),
        )),
    }
}

/// Builds one chart against an explicit selection without touching the
/// dashboard
#[utoipa::path(
    get,
    path = "/api/v1/charts/{chart_id}/preview",
    tag = "charts",
    params(
        ("chart_id" = String, Path, description = "Chart ID"),
        ChartQuery
    ),
    responses(
        (status = 200, description = "Chart built successfully", body = ApiResponse<ChartSpec>),
        (status = 400, description = "Invalid selection", body = ErrorResponse),
        (status = 404, description = "Chart not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn preview_chart(
    Path(chart_id): Path<String>,
    Valid(Query(query)): Valid<Query<ChartQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChartSpec>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering preview_chart function");
    let selection = explicit_selection(
        &state.dataset,
        &state.registry,
        query.measure.clone(),
        query.start_date,
        query.end_date,
    );

    // Create cache key
    let cache_key = format!("preview_{}_{:?}", chart_id, selection);

    // Check cache first
    if let Some(spec) = state.cache.get(&cache_key).await {
        return Ok(Json(ApiResponse {
            data: spec,
            message: "Chart preview retrieved from cache".to_string(),
            success: true,
        }));
    }

    let spec = render_chart(&state.dataset, &state.registry, &chart_id, &selection)
        .map_err(compute_error)?;
    info!("Built preview of {} for {}", chart_id, selection.measure_label());

    state.cache.insert(cache_key, spec.clone()).await;

    Ok(Json(ApiResponse {
        data: spec,
        message: "Chart preview built successfully".to_string(),
        success: true,
    }))
}
