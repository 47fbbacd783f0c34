use std::collections::HashMap;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart, Path, Query, State};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::response::json_error;
use crate::services::uploads;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordResponse {
    word: String,
    meaning: String,
    image_url: String,
}

/// Fields accepted by both the JSON and the multipart body of POST/PUT.
/// The optional `image` file part only exists in the multipart form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryBody {
    word: Option<String>,
    meaning: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Default)]
struct EntryInput {
    word: Option<String>,
    meaning: Option<String>,
    image_url: Option<String>,
    image: Option<(Option<String>, Bytes)>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let word = params
        .get("query")
        .map(|value| value.trim())
        .unwrap_or_default();
    if word.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Missing query")
            .into_response();
    }

    match state.store().get_one(word).await {
        Ok(Some(record)) => Json(WordResponse {
            word: word.to_string(),
            meaning: record.meaning,
            image_url: record.image_url,
        })
        .into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found").into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word lookup failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response()
        }
    }
}

pub async fn all(State(state): State<AppState>) -> Response {
    let entries = match state.store().get_all().await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(error = %err, "word listing failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response();
        }
    };

    // Serialized as an object so the map keeps the backend's entry order.
    let mut body = Map::with_capacity(entries.len());
    for (word, record) in entries {
        body.insert(
            word,
            serde_json::json!({
                "meaning": record.meaning,
                "imageUrl": record.image_url,
            }),
        );
    }

    Json(Value::Object(body)).into_response()
}

pub async fn create(State(state): State<AppState>, req: Request<Body>) -> Response {
    let input = match parse_entry_input(&state, req).await {
        Ok(input) => input,
        Err(res) => return res,
    };

    let word = input.word.as_deref().map(str::trim).unwrap_or_default();
    let meaning = input.meaning.as_deref().map(str::trim).unwrap_or_default();
    if word.is_empty() || meaning.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Word and meaning are required",
        )
        .into_response();
    }

    let mut image_url = input
        .image_url
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if let Some((file_name, data)) = input.image {
        match uploads::save_image(state.upload_dir(), file_name.as_deref(), &data).await {
            Ok(url) => image_url = url,
            Err(err) => {
                tracing::warn!(error = %err, "image upload failed");
                return json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error",
                )
                .into_response();
            }
        }
    }

    match state.store().upsert(word, meaning, &image_url).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word upsert failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response()
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(word): Path<String>,
    req: Request<Body>,
) -> Response {
    let word = word.trim().to_string();
    if word.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Missing word")
            .into_response();
    }

    let input = match parse_entry_input(&state, req).await {
        Ok(input) => input,
        Err(res) => return res,
    };

    // A provided-but-empty meaning would persist an empty entry; reject it.
    // A provided-but-empty imageUrl is an explicit "clear the image".
    if input
        .meaning
        .as_deref()
        .is_some_and(|value| value.trim().is_empty())
    {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Meaning cannot be empty",
        )
        .into_response();
    }

    // Updating an absent word is a no-op; bail out before an uploaded image
    // gets written, or it would orphan a file no entry references.
    match state.store().get_one(&word).await {
        Ok(Some(_)) => {}
        Ok(None) => return Json(SuccessResponse { success: true }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word lookup failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response();
        }
    }

    let mut image_url = input.image_url;
    if let Some((file_name, data)) = input.image {
        match uploads::save_image(state.upload_dir(), file_name.as_deref(), &data).await {
            Ok(url) => image_url = Some(url),
            Err(err) => {
                tracing::warn!(error = %err, "image upload failed");
                return json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error",
                )
                .into_response();
            }
        }
    }

    match state
        .store()
        .update(&word, input.meaning.as_deref(), image_url.as_deref())
        .await
    {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word update failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response()
        }
    }
}

pub async fn remove(State(state): State<AppState>, Path(word): Path<String>) -> Response {
    match state.store().delete(word.trim()).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word delete failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
            .into_response()
        }
    }
}

/// Accepts either a JSON body or a multipart form (the admin page submits
/// multipart when an image file is attached). No file is written here; the
/// caller validates the entry first.
async fn parse_entry_input(
    state: &AppState,
    req: Request<Body>,
) -> Result<EntryInput, Response> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        return parse_multipart(state, req).await;
    }

    let body_bytes = match axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return Err(
                json_error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Invalid request body")
                    .into_response(),
            );
        }
    };

    let body: EntryBody = if body_bytes.is_empty() {
        EntryBody::default()
    } else {
        match serde_json::from_slice(&body_bytes) {
            Ok(body) => body,
            Err(_) => {
                return Err(json_error(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "Invalid request body",
                )
                .into_response());
            }
        }
    };

    Ok(EntryInput {
        word: body.word,
        meaning: body.meaning,
        image_url: body.image_url,
        image: None,
    })
}

async fn parse_multipart(state: &AppState, req: Request<Body>) -> Result<EntryInput, Response> {
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(_) => {
            return Err(
                json_error(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Invalid multipart body")
                    .into_response(),
            );
        }
    };

    let mut input = EntryInput::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => {
                return Err(json_error(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "Invalid multipart body",
                )
                .into_response());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "word" => input.word = field.text().await.ok(),
            "meaning" => input.meaning = field.text().await.ok(),
            "imageUrl" => input.image_url = field.text().await.ok(),
            "image" => {
                let file_name = field.file_name().map(|value| value.to_string());
                if let Ok(data) = field.bytes().await {
                    if !data.is_empty() {
                        input.image = Some((file_name, data));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(input)
}
