pub mod charts;
pub mod controls;
pub mod dataset;
pub mod events;
pub mod health;

use axum::{http::StatusCode, response::Json};
use compute::error::ComputeError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Maps a compute failure onto an HTTP error response.
pub(crate) fn compute_error(err: ComputeError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        ComputeError::UnknownChart(_) => (StatusCode::NOT_FOUND, "CHART_NOT_FOUND"),
        ComputeError::InvalidSelection(_) => (StatusCode::BAD_REQUEST, "INVALID_SELECTION"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "COMPUTE_ERROR"),
    };
    if status.is_server_error() {
        error!("Chart computation failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
    (status, Json(ErrorResponse::new(err.to_string(), code)))
}
