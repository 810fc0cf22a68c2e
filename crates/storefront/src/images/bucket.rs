//! Object storage backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Errors returned by an object storage backend.
#[derive(Debug, Error)]
pub enum BucketError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The client could not be configured.
    #[error("invalid storage configuration: {0}")]
    Config(String),

    /// The backend refused the operation.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// A bucket of publicly readable objects.
pub trait ObjectStorage: Send + Sync {
    /// Upload `bytes` under `key`, returning the stored path.
    fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, BucketError>> + Send;

    /// Public URL for `key`. Does not check that the object exists.
    fn public_url(&self, key: &str) -> String;

    /// Delete the objects under `keys`.
    fn remove(&self, keys: &[String]) -> impl Future<Output = Result<(), BucketError>> + Send;
}

// =============================================================================
// HTTP Bucket
// =============================================================================

/// Client for a Supabase-style storage REST API.
///
/// - upload: `POST {base}/storage/v1/object/{bucket}/{key}`
/// - public URL: `{base}/storage/v1/object/public/{bucket}/{key}`
/// - delete: `DELETE {base}/storage/v1/object/{bucket}` with `{"prefixes": [...]}`
#[derive(Clone)]
pub struct HttpBucket {
    client: reqwest::Client,
    base: String,
    bucket: String,
}

impl std::fmt::Debug for HttpBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBucket")
            .field("base", &self.base)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl HttpBucket {
    /// Create a client for `bucket` at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(
        base_url: &Url,
        bucket: impl Into<String>,
        service_key: &SecretString,
    ) -> Result<Self, BucketError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", service_key.expose_secret()))
            .map_err(|e| BucketError::Config(format!("Invalid service key format: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut api_key = HeaderValue::from_str(service_key.expose_secret())
            .map_err(|e| BucketError::Config(format!("Invalid service key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base: base_url.as_str().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BucketError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BucketError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl ObjectStorage for HttpBucket {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BucketError> {
        let response = self
            .client
            .post(self.object_url(key))
            .header(CONTENT_TYPE, content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(format!("{}/{key}", self.bucket))
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    async fn remove(&self, keys: &[String]) -> Result<(), BucketError> {
        let url = format!("{}/storage/v1/object/{}", self.base, self.bucket);
        let body = serde_json::json!({ "prefixes": keys });
        let response = self.client.delete(url).json(&body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

// =============================================================================
// Memory Bucket
// =============================================================================

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process bucket, served by the storefront itself under a public base
/// URL. Failures can be switched on to exercise error paths.
#[derive(Debug)]
pub struct MemoryBucket {
    objects: Mutex<HashMap<String, StoredObject>>,
    public_base: String,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl MemoryBucket {
    #[must_use]
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            public_base: public_base.into().trim_end_matches('/').to_string(),
            fail_uploads: AtomicBool::new(false),
            fail_removals: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectStorage for MemoryBucket {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BucketError> {
        if self.fail_uploads.load(Ordering::Relaxed) {
            return Err(BucketError::Rejected("uploads are disabled".to_string()));
        }
        self.lock().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base)
    }

    async fn remove(&self, keys: &[String]) -> Result<(), BucketError> {
        if self.fail_removals.load(Ordering::Relaxed) {
            return Err(BucketError::Rejected("removals are disabled".to_string()));
        }
        let mut objects = self.lock();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }
}

// =============================================================================
// Configured Bucket
// =============================================================================

/// The bucket selected by configuration.
#[derive(Debug)]
pub enum Bucket {
    Http(HttpBucket),
    Memory(MemoryBucket),
}

impl Bucket {
    /// The in-process bucket, if that is the configured backend.
    #[must_use]
    pub const fn as_memory(&self) -> Option<&MemoryBucket> {
        match self {
            Self::Memory(bucket) => Some(bucket),
            Self::Http(_) => None,
        }
    }
}

impl ObjectStorage for Bucket {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BucketError> {
        match self {
            Self::Http(bucket) => bucket.upload(key, bytes, content_type).await,
            Self::Memory(bucket) => bucket.upload(key, bytes, content_type).await,
        }
    }

    fn public_url(&self, key: &str) -> String {
        match self {
            Self::Http(bucket) => bucket.public_url(key),
            Self::Memory(bucket) => bucket.public_url(key),
        }
    }

    async fn remove(&self, keys: &[String]) -> Result<(), BucketError> {
        match self {
            Self::Http(bucket) => bucket.remove(keys).await,
            Self::Memory(bucket) => bucket.remove(keys).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_http_bucket_urls() {
        let base = Url::parse("https://abc.supabase.co/").unwrap();
        let bucket =
            HttpBucket::new(&base, "images", &SecretString::from("service-key")).unwrap();
        assert_eq!(
            bucket.public_url("1700000000000-a1b2c3d4.png"),
            "https://abc.supabase.co/storage/v1/object/public/images/1700000000000-a1b2c3d4.png"
        );
        assert_eq!(
            bucket.object_url("k.png"),
            "https://abc.supabase.co/storage/v1/object/images/k.png"
        );
    }

    #[test]
    fn test_http_bucket_rejects_bad_key() {
        let base = Url::parse("https://abc.supabase.co").unwrap();
        let result = HttpBucket::new(&base, "images", &SecretString::from("bad\nkey"));
        assert!(matches!(result, Err(BucketError::Config(_))));
    }

    #[tokio::test]
    async fn test_memory_bucket_upload_and_remove() {
        let bucket = MemoryBucket::new("http://localhost:3000/media/");
        let path = bucket
            .upload("a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(path, "a.png");
        assert_eq!(bucket.get("a.png").unwrap().content_type, "image/png");
        assert_eq!(bucket.public_url("a.png"), "http://localhost:3000/media/a.png");

        bucket.remove(&["a.png".to_string()]).await.unwrap();
        assert!(bucket.is_empty());
    }

    #[tokio::test]
    async fn test_memory_bucket_failure_switches() {
        let bucket = MemoryBucket::new("http://localhost/media");
        bucket.set_fail_uploads(true);
        assert!(matches!(
            bucket.upload("a.png", vec![], "image/png").await,
            Err(BucketError::Rejected(_))
        ));
        bucket.set_fail_removals(true);
        assert!(bucket.remove(&["a.png".to_string()]).await.is_err());
    }
}
