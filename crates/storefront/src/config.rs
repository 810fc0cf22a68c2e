//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `ADMIN_PASSWORD` - Shared secret for the admin panel
//! - `STORAGE_URL` - Object storage base URL (when `STORAGE_BACKEND=http`)
//! - `STORAGE_SERVICE_KEY` - Object storage service key (when `STORAGE_BACKEND=http`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory for persisted state (default: data)
//! - `STOREFRONT_STORAGE_QUOTA_BYTES` - Reject persisted values larger than this
//! - `STORAGE_BACKEND` - `http` (default) or `memory`
//! - `STORAGE_BUCKET` - Bucket holding uploaded images (default: images)
//! - `IMAGE_PLACEHOLDER_URL` - Image shown when a reference is empty
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_PLACEHOLDER_URL: &str = "https://placehold.co/600x400?text=Bistro";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Directory holding one JSON document per persisted slice
    pub data_dir: PathBuf,
    /// Largest value the file storage accepts, if limited
    pub storage_quota_bytes: Option<usize>,
    /// Shared secret for the admin panel
    pub admin_password: SecretString,
    /// Where uploaded images go
    pub object_storage: ObjectStorageConfig,
    /// Image shown for empty references
    pub image_placeholder_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Object storage backend selection.
#[derive(Clone)]
pub enum ObjectStorageConfig {
    /// Supabase-style storage REST API.
    Http {
        url: Url,
        bucket: String,
        service_key: SecretString,
    },
    /// In-process bucket served under `/media`.
    Memory,
}

impl std::fmt::Debug for ObjectStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { url, bucket, .. } => f
                .debug_struct("Http")
                .field("url", &url.as_str())
                .field("bucket", bucket)
                .field("service_key", &"[REDACTED]")
                .finish(),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup: &lookup };

        let host = env.parsed_or("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed_or("STOREFRONT_PORT", "3000")?;
        let base_url = parse_url("STOREFRONT_BASE_URL", &env.required("STOREFRONT_BASE_URL")?)?;
        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", "data"));
        let storage_quota_bytes = env
            .optional("STOREFRONT_STORAGE_QUOTA_BYTES")
            .map(|raw| parse_var("STOREFRONT_STORAGE_QUOTA_BYTES", &raw))
            .transpose()?;

        let admin_password = SecretString::from(env.required("ADMIN_PASSWORD")?);
        if admin_password.expose_secret().trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ADMIN_PASSWORD".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let object_storage = ObjectStorageConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            storage_quota_bytes,
            admin_password,
            object_storage,
            image_placeholder_url: env.or_default("IMAGE_PLACEHOLDER_URL", DEFAULT_PLACEHOLDER_URL),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Public base URL of the in-process media route.
    #[must_use]
    pub fn media_base_url(&self) -> String {
        format!("{}/media", self.base_url.as_str().trim_end_matches('/'))
    }
}

impl ObjectStorageConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        match env.or_default("STORAGE_BACKEND", "http").as_str() {
            "memory" => Ok(Self::Memory),
            "http" => Ok(Self::Http {
                url: parse_url("STORAGE_URL", &env.required("STORAGE_URL")?)?,
                bucket: env.or_default("STORAGE_BUCKET", "images"),
                service_key: SecretString::from(env.required("STORAGE_SERVICE_KEY")?),
            }),
            other => Err(ConfigError::InvalidEnvVar(
                "STORAGE_BACKEND".to_string(),
                format!("expected `http` or `memory`, got `{other}`"),
            )),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source with the usual accessors.
struct Env<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Env<'_> {
    /// Get a required variable. Empty values count as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        parse_var(key, &self.or_default(key, default))
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = parse_var::<Url>(key, raw)?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(url)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme `{}`", url.scheme()),
        ))
    }
}
