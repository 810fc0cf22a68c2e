//! Newsletter subscribers and contact messages.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bistro_core::{ContactSubmission, SubmissionId, Subscriber, SubscriberId};

use super::AdminResponse;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[instrument(skip_all)]
pub async fn subscribers(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Vec<Subscriber>>> {
    let subscribers = state.subscribers().read().await.all().to_vec();
    Json(AdminResponse::new(subscribers))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_subscriber(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<SubscriberId>>> {
    let id = SubscriberId::new(id);
    add_breadcrumb("admin", "Delete subscriber", Some(&[("id", id.as_str())]));

    let persistence = state
        .subscribers()
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::NotFound("Subscriber".to_string()))?;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}

#[derive(Debug, Serialize)]
pub struct Messages {
    pub unread: usize,
    pub messages: Vec<ContactSubmission>,
}

/// All contact messages, newest first.
#[instrument(skip_all)]
pub async fn messages(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<AdminResponse<Messages>> {
    let inbox = state.inbox().read().await;
    Json(AdminResponse::new(Messages {
        unread: inbox.unread_count(),
        messages: inbox.newest_first().into_iter().cloned().collect(),
    }))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn message(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<ContactSubmission>>> {
    let message = state
        .inbox()
        .read()
        .await
        .get(&SubmissionId::new(id))
        .cloned()
        .ok_or_else(|| AppError::NotFound("Message".to_string()))?;
    Ok(Json(AdminResponse::new(message)))
}

#[derive(Debug, Deserialize)]
pub struct MarkRead {
    #[serde(default = "read_by_default")]
    pub read: bool,
}

const fn read_by_default() -> bool {
    true
}

/// Mark a message read or unread.
#[instrument(skip_all, fields(id = %id))]
pub async fn mark_read(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<MarkRead>,
) -> Result<Json<AdminResponse<SubmissionId>>> {
    let id = SubmissionId::new(id);
    let persistence = state
        .inbox()
        .write()
        .await
        .mark_read(&id, request.read)
        .ok_or_else(|| AppError::NotFound("Message".to_string()))?;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_message(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse<SubmissionId>>> {
    let id = SubmissionId::new(id);
    add_breadcrumb("admin", "Delete message", Some(&[("id", id.as_str())]));

    let persistence = state
        .inbox()
        .write()
        .await
        .remove(&id)
        .ok_or_else(|| AppError::NotFound("Message".to_string()))?;

    Ok(Json(AdminResponse::persisted(id, &persistence)))
}
