//! Admin authentication extractor.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::auth::AuthGate;

/// Extractor that requires the admin login marker in the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "Hello, admin!"
/// }
/// ```
pub struct RequireAdmin;

/// Returned when an admin route is called without logging in.
pub enum AdminRejection {
    /// No session layer is installed.
    MissingSession,
    /// The session is not logged in.
    Unauthorized,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSession => {
                tracing::error!("Admin route reached without a session layer");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Admin login required" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::MissingSession)?;

        if AuthGate::is_authenticated(session).await {
            Ok(Self)
        } else {
            Err(AdminRejection::Unauthorized)
        }
    }
}
