use axum::{extract::State, response::Json};
use tracing::instrument;

use crate::schemas::{ApiResponse, AppState, ControlsResponse};

/// Dashboard controls, the values they accept and the current selection
#[utoipa::path(
    get,
    path = "/api/v1/controls",
    tag = "controls",
    responses(
        (status = 200, description = "Controls retrieved successfully", body = ApiResponse<ControlsResponse>)
    )
)]
#[instrument]
pub async fn get_controls(State(state): State<AppState>) -> Json<ApiResponse<ControlsResponse>> {
    let dashboard = state.dashboard.lock().await;

    Json(ApiResponse {
        data: ControlsResponse {
            controls: dashboard.controls(),
            selection: dashboard.selection().clone(),
        },
        message: "Controls retrieved successfully".to_string(),
        success: true,
    })
}
