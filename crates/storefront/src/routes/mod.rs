//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Catalog
//! GET  /api/site                    - Site content and design
//! GET  /api/menu                    - All categories and dishes
//! GET  /api/categories/{slug}       - One category with its dishes
//! GET  /api/dishes/{id}             - One dish
//! GET  /api/gallery                 - Gallery photos
//! GET  /api/testimonials            - Guest testimonials
//! GET  /media/{key}                 - Image from the in-process bucket
//!
//! # Cart (session)
//! GET  /api/cart                    - Cart with line totals
//! POST /api/cart/add                - Add a dish
//! POST /api/cart/update             - Set a line quantity
//! POST /api/cart/remove             - Remove a line
//! POST /api/cart/clear              - Empty the cart
//! POST /api/checkout                - Build the messaging handoff link
//!
//! # Guests
//! POST /api/contact                 - Contact form
//! POST /api/newsletter              - Newsletter sign-up
//!
//! # Admin (see `admin` for the full list)
//! POST /admin/login                 - Log in with the shared secret
//! POST /admin/logout                - Log out
//! GET  /admin/session               - Login status
//! *    /admin/api/...               - Content management (login required)
//! ```

pub mod admin;
pub mod cart;
pub mod guest;
pub mod media;
pub mod menu;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/site", get(menu::site))
        .route("/menu", get(menu::menu))
        .route("/categories/{slug}", get(menu::category))
        .route("/dishes/{id}", get(menu::dish))
        .route("/gallery", get(menu::gallery))
        .route("/testimonials", get(menu::testimonials))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Health check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Catalog
        .nest("/api", catalog_routes())
        .route("/media/{key}", get(media::show))
        // Cart
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(cart::checkout))
        // Guests
        .route("/api/contact", post(guest::contact))
        .route("/api/newsletter", post(guest::subscribe))
        // Admin
        .nest("/admin", admin::router())
}
