use super::{GroupKey, ViewerError};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use base64::{Engine, engine::general_purpose};
use serde::Deserialize;
use tracing::error;

#[derive(Deserialize)]
pub struct SearchRequest {
    pub hn: String,
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub key: String,
}

#[axum::debug_handler]
pub async fn search_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    match app_state.viewer.search(&payload.hn).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(ViewerError::EmptyIdentifier) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            error!("Search failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[axum::debug_handler]
pub async fn gallery_snapshot_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.viewer.snapshot().await)
}

#[axum::debug_handler]
pub async fn select_group_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let key = GroupKey::parse(&payload.key).map_err(|e| {
        error!("Rejected selection: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    match app_state.viewer.select_group(key).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(ViewerError::UnknownGroup(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Selection failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[axum::debug_handler]
pub async fn gallery_images_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.viewer.displayed_images().await)
}

/// Serves one loaded image decoded to raw bytes with its media type.
/// 404 until a content batch has fetched the path.
#[axum::debug_handler]
pub async fn image_content_handler(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let storage_path = urlencoding::decode(&path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.clone());

    let Some((encoded_content, media_type)) =
        app_state.viewer.cached_content(&storage_path).await
    else {
        return (StatusCode::NOT_FOUND, "Image not loaded").into_response();
    };

    match general_purpose::STANDARD.decode(encoded_content.as_bytes()) {
        Ok(bytes) => ([(header::CONTENT_TYPE, media_type)], bytes).into_response(),
        Err(e) => {
            error!("Cached image {} is not valid base64: {}", storage_path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
