//! Bistro Storefront library.
//!
//! A restaurant storefront: a public JSON API for the menu, a session
//! cart that hands orders off as a pre-filled messaging link, and an
//! admin content-management API over the same domain store.
//!
//! The library exposes [`app`] so the binary and the integration tests
//! build the exact same router.
//!
//! # Modules
//!
//! - [`store`] - Domain state, actions, reducer and hydration
//! - [`storage`] - Key-value persistence (file or memory)
//! - [`images`] - Image references and object storage
//! - [`cart`] / [`order`] - Session cart and checkout handoff
//! - [`inbox`] - Newsletter subscribers and contact messages
//! - [`auth`] - Shared-secret admin gate
//! - [`routes`] / [`middleware`] - HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod collection;
pub mod config;
pub mod error;
pub mod images;
pub mod inbox;
pub mod middleware;
pub mod order;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod validation;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
