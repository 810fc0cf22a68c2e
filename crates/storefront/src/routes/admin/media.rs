//! Direct image upload and raw action dispatch.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{AdminResponse, apply};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::images::ImageRef;
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::Action;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub data_url: String,
}

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub key: String,
    pub url: String,
}

/// Upload one inline image and return its key and public URL.
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(request): Json<UploadRequest>,
) -> Result<(StatusCode, Json<Uploaded>)> {
    if !matches!(ImageRef::classify(&request.data_url), ImageRef::Inline(_)) {
        return Err(AppError::BadRequest(
            "dataUrl must be a base64 data: URL".to_string(),
        ));
    }
    add_breadcrumb("admin", "Upload image", None);

    let images = state.images();
    let key = images.store(&request.data_url).await?;
    let url = images.resolve(&key);
    Ok((StatusCode::CREATED, Json(Uploaded { key, url })))
}

#[derive(Debug, Serialize)]
pub struct Dispatched {
    pub action: &'static str,
    pub applied: bool,
}

/// Apply a raw store action.
///
/// Image references in the action are stored as given; nothing is uploaded
/// or deleted. Unrecognised action types are accepted and ignored.
#[instrument(skip_all, fields(action = action.kind()))]
pub async fn dispatch(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(action): Json<Action>,
) -> Json<AdminResponse<Dispatched>> {
    let kind = action.kind();
    let applied = !matches!(action, Action::Unknown);
    add_breadcrumb("admin", "Dispatch action", Some(&[("action", kind)]));

    let persistence = apply(&state, action).await;
    Json(AdminResponse::persisted(
        Dispatched {
            action: kind,
            applied,
        },
        &persistence,
    ))
}
