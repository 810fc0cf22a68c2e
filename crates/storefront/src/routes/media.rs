//! Serves images held by the in-process bucket.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Return the stored object for `key`.
///
/// Only the in-process bucket is served; with an HTTP bucket every key is
/// not found, since images load straight from the storage service.
pub async fn show(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let object = state
        .images()
        .bucket()
        .as_memory()
        .and_then(|bucket| bucket.get(&key));

    match object {
        Some(object) => (
            [
                (header::CONTENT_TYPE, object.content_type),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            object.bytes,
        )
            .into_response(),
        None => AppError::NotFound("Image".to_string()).into_response(),
    }
}
