use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::response::json_error;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    prompt: String,
}

#[derive(Serialize)]
struct GenerateResponse {
    url: String,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Response {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Missing prompt")
            .into_response();
    }

    let images = state.images();
    if !images.is_available() {
        return json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Image generation is not configured",
        )
        .into_response();
    }

    match images.generate(prompt).await {
        Ok(url) => Json(GenerateResponse { url }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "image generation failed");
            json_error(
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Image generation failed",
            )
            .into_response()
        }
    }
}
