//! Contact form and newsletter route handlers.
//!
//! Submissions are stored locally for the admin panel. No email or message
//! is sent to the guest or the restaurant.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bistro_core::{SubmissionId, SubscriberId};

use crate::error::Result;
use crate::inbox::{ContactForm, Subscription};
use crate::state::AppState;

/// Acknowledgement for a stored submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Received<Id> {
    pub id: Id,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Newsletter sign-up request.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub name: String,
    pub phone: String,
}

/// Store a contact form submission.
#[instrument(skip(state, form))]
pub async fn contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<Received<SubmissionId>>)> {
    let (submission, persistence) = state.inbox().write().await.submit(form)?;

    Ok((
        StatusCode::CREATED,
        Json(Received {
            id: submission.id,
            message: "Thanks! We'll get back to you soon.".to_string(),
            warning: persistence.warning(),
        }),
    ))
}

/// Sign up for the newsletter.
///
/// Signing up again with the same phone number succeeds without creating
/// a second entry.
#[instrument(skip(state, request))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Received<SubscriberId>>)> {
    let subscription = state
        .subscribers()
        .write()
        .await
        .subscribe(&request.name, &request.phone)?;

    let response = match subscription {
        Subscription::Added(subscriber, persistence) => (
            StatusCode::CREATED,
            Json(Received {
                id: subscriber.id,
                message: "You're subscribed!".to_string(),
                warning: persistence.warning(),
            }),
        ),
        Subscription::Existing(subscriber) => (
            StatusCode::OK,
            Json(Received {
                id: subscriber.id,
                message: "You're already subscribed.".to_string(),
                warning: None,
            }),
        ),
    };
    Ok(response)
}
