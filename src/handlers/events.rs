use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use common::ChartSpec;
use tracing::{debug, info, instrument};

use crate::handlers::compute_error;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, EventRequest, EventResponse};

/// Applies a user action to the dashboard
///
/// All changes are validated together. When any of them is rejected nothing
/// changes; otherwise every chart depending on a changed control is rebuilt
/// and returned.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "events",
    request_body = EventRequest,
    responses(
        (status = 200, description = "Action applied", body = ApiResponse<EventResponse>),
        (status = 400, description = "Action rejected", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn post_event(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<EventRequest>>,
) -> Result<Json<ApiResponse<EventResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let mut dashboard = state.dashboard.lock().await;

    let mut rendered: Vec<ChartSpec> = Vec::new();
    let affected = dashboard
        .dispatch(&request.changes, &mut rendered)
        .map_err(compute_error)?;
    debug!("Recomputed charts: {:?}", affected);
    info!(
        "Applied {} control changes, {} charts updated",
        request.changes.len(),
        rendered.len()
    );

    Ok(Json(ApiResponse {
        data: EventResponse {
            selection: dashboard.selection().clone(),
            charts: rendered,
        },
        message: "Action applied successfully".to_string(),
        success: true,
    }))
}
