//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, one hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! Admin routes additionally require the [`RequireAdmin`] extractor.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{AdminRejection, RequireAdmin};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
