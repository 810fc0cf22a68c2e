//! Integration tests for Bistro.
//!
//! Each test spawns the full storefront router on an ephemeral port with
//! in-memory storage and an in-process image bucket, then talks to it over
//! HTTP with a cookie-keeping client, so session state (cart, admin login)
//! behaves as it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bistro-integration-tests
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bistro_storefront::config::StorefrontConfig;
use bistro_storefront::images::{Bucket, MemoryBucket};
use bistro_storefront::state::AppState;
use bistro_storefront::storage::{KeyValueStorage, MemoryStorage};
use reqwest::Client;
use serde_json::{Value, json};

/// Admin password used by every test app.
pub const ADMIN_PASSWORD: &str = "let-me-cook";

/// A 1x1 PNG as a data URL.
pub const PIXEL_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

/// A running storefront and a client with its own cookie jar.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
    pub storage: Arc<dyn KeyValueStorage>,
}

impl TestApp {
    /// Spawn with fresh in-memory storage.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(MemoryStorage::new())).await
    }

    /// Spawn over existing storage, hydrating from whatever it holds.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    #[allow(clippy::expect_used)]
    pub async fn spawn_with(storage: Arc<dyn KeyValueStorage>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let base_url = format!("http://{addr}");

        let config = test_config(&base_url);
        let bucket = Bucket::Memory(MemoryBucket::new(config.media_base_url()));
        let state = AppState::with_parts(config, storage.clone(), bucket);

        let app = bistro_storefront::app(state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("build HTTP client");

        Self {
            base_url,
            client,
            state,
            storage,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The in-process image bucket.
    ///
    /// # Panics
    ///
    /// Panics if the app was built with another bucket.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn bucket(&self) -> &MemoryBucket {
        self.state
            .images()
            .bucket()
            .as_memory()
            .expect("test apps use the memory bucket")
    }

    /// GET `path` and return status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics on transport errors or a non-JSON body.
    #[allow(clippy::expect_used)]
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("send GET");
        let status = response.status().as_u16();
        (status, response.json().await.expect("JSON body"))
    }

    /// Send `body` as JSON with `method` and return status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics on transport errors or a non-JSON body.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, method: reqwest::Method, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .expect("send request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("JSON body"))
    }

    /// POST `body` as JSON.
    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, body).await
    }

    /// Log this client in as admin.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&self) {
        let (status, _) = self
            .post("/admin/login", &json!({ "password": ADMIN_PASSWORD }))
            .await;
        assert_eq!(status, 200, "admin login failed");
    }
}

/// Configuration for a test app served at `base_url`.
///
/// # Panics
///
/// Panics if the fixed test variables do not parse.
#[allow(clippy::expect_used)]
#[must_use]
pub fn test_config(base_url: &str) -> StorefrontConfig {
    let vars: HashMap<&str, String> = [
        ("STOREFRONT_BASE_URL", base_url.to_string()),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD.to_string()),
        ("STORAGE_BACKEND", "memory".to_string()),
        ("IMAGE_PLACEHOLDER_URL", "/placeholder.svg".to_string()),
    ]
    .into_iter()
    .collect();
    StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).expect("test configuration")
}
