//! State survives a restart through storage; bad storage falls back to
//! defaults.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bistro_integration_tests::TestApp;
use bistro_storefront::storage::{KeyValueStorage, MemoryStorage, keys};
use serde_json::json;

#[tokio::test]
async fn test_admin_changes_survive_restart() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());

    let first = TestApp::spawn_with(storage.clone()).await;
    first.login().await;
    let (status, _) = first
        .post("/admin/api/categories", &json!({ "name": "Brunch" }))
        .await;
    assert_eq!(status, 201);
    first
        .post("/api/newsletter", &json!({ "name": "Ada", "phone": "555 000 1111" }))
        .await;

    let second = TestApp::spawn_with(storage).await;
    let (status, _) = second.get("/api/categories/brunch").await;
    assert_eq!(status, 200);
    assert_eq!(second.state.subscribers().read().await.all().len(), 1);
    assert!(second.state.store().read().await.is_hydrated());
}

#[tokio::test]
async fn test_missing_slices_keep_defaults() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    storage.set(keys::TESTIMONIALS, "[]").unwrap();

    let app = TestApp::spawn_with(storage).await;
    let (_, testimonials) = app.get("/api/testimonials").await;
    assert!(testimonials.as_array().unwrap().is_empty());

    let (_, menu) = app.get("/api/menu").await;
    assert_eq!(menu["dishes"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_corrupt_slice_loads_defaults() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    storage.set(keys::TESTIMONIALS, "[]").unwrap();
    storage.set(keys::DISHES, "{\"oops\":").unwrap();

    let app = TestApp::spawn_with(storage.clone()).await;
    let (_, testimonials) = app.get("/api/testimonials").await;
    assert_eq!(testimonials.as_array().unwrap().len(), 2);

    // Hydration never writes, so the bad document is still there.
    assert_eq!(
        storage.get(keys::DISHES).unwrap().as_deref(),
        Some("{\"oops\":")
    );
}
