//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::AuthGate;
use crate::config::{ObjectStorageConfig, StorefrontConfig};
use crate::images::{Bucket, BucketError, HttpBucket, ImageStore, MemoryBucket};
use crate::inbox::{ContactInbox, Subscribers};
use crate::storage::{FileStorage, KeyValueStorage};
use crate::store::DomainStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Each mutable component sits
/// behind its own lock; writers hold a lock only for the in-memory change
/// and the synchronous write to storage, never across an await.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: RwLock<DomainStore>,
    subscribers: RwLock<Subscribers>,
    inbox: RwLock<ContactInbox>,
    images: ImageStore<Bucket>,
    auth: AuthGate,
}

impl AppState {
    /// Create the state from configuration: file storage under the data
    /// directory, hydrated once, and the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the object storage client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BucketError> {
        let mut storage = FileStorage::open(&config.data_dir);
        if let Some(quota) = config.storage_quota_bytes {
            storage = storage.with_quota(quota);
        }

        let bucket = match &config.object_storage {
            ObjectStorageConfig::Http {
                url,
                bucket,
                service_key,
            } => Bucket::Http(HttpBucket::new(url, bucket.clone(), service_key)?),
            ObjectStorageConfig::Memory => {
                Bucket::Memory(MemoryBucket::new(config.media_base_url()))
            }
        };

        Ok(Self::with_parts(config, Arc::new(storage), bucket))
    }

    /// Create the state from explicit storage and bucket.
    ///
    /// The domain store is hydrated here.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStorage>,
        bucket: Bucket,
    ) -> Self {
        let mut store = DomainStore::new(storage.clone());
        store.hydrate();

        let images = ImageStore::new(bucket, config.image_placeholder_url.clone());
        let auth = AuthGate::new(config.admin_password.clone());

        Self {
            inner: Arc::new(AppStateInner {
                subscribers: RwLock::new(Subscribers::load(storage.clone())),
                inbox: RwLock::new(ContactInbox::load(storage)),
                store: RwLock::new(store),
                images,
                auth,
                config,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The domain store.
    #[must_use]
    pub fn store(&self) -> &RwLock<DomainStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn subscribers(&self) -> &RwLock<Subscribers> {
        &self.inner.subscribers
    }

    #[must_use]
    pub fn inbox(&self) -> &RwLock<ContactInbox> {
        &self.inner.inbox
    }

    /// The image reference store.
    #[must_use]
    pub fn images(&self) -> &ImageStore<Bucket> {
        &self.inner.images
    }

    #[must_use]
    pub fn auth(&self) -> &AuthGate {
        &self.inner.auth
    }
}
