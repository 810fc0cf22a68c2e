//! Admin API route handlers.
//!
//! Everything except login, logout and the session probe requires the
//! admin marker in the session (see [`RequireAdmin`](crate::middleware::RequireAdmin)).
//! Handlers return raw image references so the editor can round-trip them.

pub mod auth;
pub mod content;
pub mod inbox;
pub mod media;
pub mod menu;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;
use crate::storage::Persistence;
use crate::store::Action;

/// Envelope for admin responses.
///
/// `warning` is set when a change was applied in memory but could not be
/// saved to storage.
#[derive(Debug, Serialize)]
pub struct AdminResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> AdminResponse<T> {
    pub const fn new(data: T) -> Self {
        Self {
            data,
            warning: None,
        }
    }

    /// Attach the warning for a write outcome, if any.
    #[must_use]
    pub fn persisted(data: T, persistence: &Persistence) -> Self {
        Self {
            data,
            warning: persistence.warning(),
        }
    }
}

/// Apply `action` to the domain store under its write lock.
async fn apply(state: &AppState, action: Action) -> Persistence {
    state.store().write().await.dispatch(action)
}

/// Delete the bucket objects among `previous` that nothing in the current
/// state references any more. Call after the change is applied.
async fn release_images(state: &AppState, mut previous: Vec<String>) {
    previous.sort_unstable();
    previous.dedup();
    {
        let store = state.store().read().await;
        previous.retain(|reference| !store.state().references_image(reference));
    }
    for reference in &previous {
        state.images().delete(reference).await;
    }
}

/// Build the admin router, mounted under `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::status))
        // Site content and design
        .route(
            "/api/site-content",
            get(content::site_content).put(content::update_site_content),
        )
        .route("/api/design", get(content::design).put(content::update_design))
        // Menu
        .route("/api/dishes", get(menu::dishes).post(menu::create_dish))
        .route("/api/dishes/{id}", put(menu::update_dish).delete(menu::delete_dish))
        .route(
            "/api/categories",
            get(menu::categories).post(menu::create_category),
        )
        .route(
            "/api/categories/{id}",
            put(menu::update_category).delete(menu::delete_category),
        )
        .route(
            "/api/testimonials",
            get(menu::testimonials).post(menu::create_testimonial),
        )
        .route(
            "/api/testimonials/{id}",
            put(menu::update_testimonial).delete(menu::delete_testimonial),
        )
        .route("/api/gallery", get(menu::gallery).post(menu::add_gallery_image))
        .route("/api/gallery/{id}", delete(menu::delete_gallery_image))
        // Raw store access
        .route("/api/images", post(media::upload))
        .route("/api/dispatch", post(media::dispatch))
        // Guests
        .route("/api/subscribers", get(inbox::subscribers))
        .route("/api/subscribers/{id}", delete(inbox::delete_subscriber))
        .route("/api/messages", get(inbox::messages))
        .route("/api/messages/{id}", get(inbox::message).delete(inbox::delete_message))
        .route("/api/messages/{id}/read", post(inbox::mark_read))
}
