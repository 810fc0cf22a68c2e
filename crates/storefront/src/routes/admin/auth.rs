//! Admin login, logout and session status.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::auth::AuthGate;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
}

/// Check the admin password and mark the session on success.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionStatus>> {
    if state.auth().login(&session, &request.password).await? {
        Ok(Json(SessionStatus {
            authenticated: true,
        }))
    } else {
        Err(AppError::Unauthorized("Incorrect password".to_string()))
    }
}

#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<SessionStatus>> {
    AuthGate::logout(&session).await?;
    Ok(Json(SessionStatus {
        authenticated: false,
    }))
}

/// Whether this session is logged in.
pub async fn status(session: Session) -> Json<SessionStatus> {
    Json(SessionStatus {
        authenticated: AuthGate::is_authenticated(&session).await,
    })
}
