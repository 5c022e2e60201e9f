use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use timesheet::Dataset;

use super::ApiError;
use crate::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/refresh", post(refresh))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    rows: usize,
}

/// Replace the committed dataset with a manually uploaded CSV file.
#[instrument(name = "upload_csv", skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart payload: {}", e)))?
    {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("could not read uploaded file: {}", e)))?;

        let dataset = Dataset::from_csv(&text)?;
        let rows = dataset.len();
        state.commit(Arc::new(dataset)).await;
        tracing::info!("uploaded dataset replaced committed rows: {}", rows);
        return Ok(Json(UploadResponse { rows }));
    }

    Err(ApiError::bad_request("upload contained no file field"))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    status: &'static str,
}

/// Schedule a debounced re-fetch of the remote export. Rapid repeated
/// calls collapse into one fetch; the latest always wins.
#[instrument(name = "schedule_refresh", skip(state))]
pub async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<RefreshResponse>) {
    state.request_refresh().await;
    (
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            status: "scheduled",
        }),
    )
}
