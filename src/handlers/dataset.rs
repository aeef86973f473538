use axum::{extract::State, response::Json};
use common::DatasetSummary;
use compute::summary::summarize;
use tracing::{debug, instrument};

use crate::schemas::{ApiResponse, AppState};

/// Missing-value counts and Value statistics of the loaded dataset
#[utoipa::path(
    get,
    path = "/api/v1/dataset/summary",
    tag = "dataset",
    responses(
        (status = 200, description = "Dataset summary retrieved successfully", body = ApiResponse<DatasetSummary>)
    )
)]
#[instrument]
pub async fn get_dataset_summary(State(state): State<AppState>) -> Json<ApiResponse<DatasetSummary>> {
    let summary = summarize(&state.dataset);
    debug!("Summarized {} rows", summary.rows);

    Json(ApiResponse {
        data: summary,
        message: "Dataset summary retrieved successfully".to_string(),
        success: true,
    })
}
