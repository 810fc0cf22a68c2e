//! Image reference store.
//!
//! An image reference is one of:
//!
//! - empty: no image, shown as a placeholder
//! - a full `http://` or `https://` URL, used as-is
//! - an inline base64 `data:` URL, held only until it is uploaded
//! - any other `data:` URL, used as-is like a full URL
//! - an opaque key of an object in the configured bucket
//!
//! [`ImageStore::store`] turns inline data into a bucket key, and
//! [`ImageStore::resolve`] turns any reference into something a browser can
//! load.
//!
//! Uploads are plain futures with no retry. Dropping the future cancels the
//! request at its next await point; an upload that already reached the
//! bucket stays there unreferenced.

mod bucket;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

pub use bucket::{Bucket, BucketError, HttpBucket, MemoryBucket, ObjectStorage, StoredObject};

/// Errors raised while storing an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The input looked like a data URL but could not be parsed.
    #[error("malformed data URL: {0}")]
    MalformedDataUrl(&'static str),

    /// The base64 payload did not decode.
    #[error("invalid image data: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The bucket rejected the upload.
    #[error("image upload failed: {0}")]
    Upload(#[source] BucketError),
}

/// Classification of an image reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    Empty,
    Url(&'a str),
    Inline(&'a str),
    Key(&'a str),
}

impl<'a> ImageRef<'a> {
    #[must_use]
    pub fn classify(reference: &'a str) -> Self {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed)
        } else if let Some(rest) = trimmed.strip_prefix("data:") {
            if is_base64_header(rest) {
                Self::Inline(trimmed)
            } else {
                Self::Url(trimmed)
            }
        } else {
            Self::Key(trimmed)
        }
    }
}

/// Whether the header before the first comma carries a `base64` parameter.
fn is_base64_header(rest: &str) -> bool {
    rest.split_once(',').is_some_and(|(header, _)| {
        header
            .split(';')
            .skip(1)
            .any(|p| p.eq_ignore_ascii_case("base64"))
    })
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse and decode a base64 data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a base64 data URL or the payload
    /// does not decode.
    pub fn parse(input: &str) -> Result<Self, ImageError> {
        let rest = input
            .trim()
            .strip_prefix("data:")
            .ok_or(ImageError::MalformedDataUrl("missing data: prefix"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(ImageError::MalformedDataUrl("missing payload"))?;

        let mut params = header.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(ImageError::MalformedDataUrl("payload is not base64"));
        }
        if mime.is_empty() {
            return Err(ImageError::MalformedDataUrl("missing MIME type"));
        }

        let bytes = STANDARD.decode(payload.trim())?;
        Ok(Self { mime, bytes })
    }

    /// File extension for the MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        extension_for(&self.mime)
    }
}

/// File extension for an image MIME type; `bin` when unknown.
#[must_use]
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => "bin",
    }
}

const KEY_SUFFIX_LEN: usize = 8;

/// A fresh object key: `<unix millis>-<8 base36 chars>.<ext>`.
#[must_use]
pub fn generate_key(extension: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect();
    format!("{millis}-{suffix}.{extension}")
}

/// Resolves, uploads and deletes image references against a bucket.
#[derive(Debug)]
pub struct ImageStore<B> {
    bucket: B,
    placeholder: String,
}

impl<B: ObjectStorage> ImageStore<B> {
    pub fn new(bucket: B, placeholder: impl Into<String>) -> Self {
        Self {
            bucket,
            placeholder: placeholder.into(),
        }
    }

    pub const fn bucket(&self) -> &B {
        &self.bucket
    }

    /// Resolve with the configured placeholder.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> String {
        self.resolve_or(reference, &self.placeholder)
    }

    /// Resolve a reference to a loadable URL.
    ///
    /// Empty references give `placeholder`; URLs and data URLs are returned
    /// exactly as given; anything else is a bucket key.
    #[must_use]
    pub fn resolve_or(&self, reference: &str, placeholder: &str) -> String {
        match ImageRef::classify(reference) {
            ImageRef::Empty => placeholder.to_string(),
            ImageRef::Url(_) | ImageRef::Inline(_) => reference.to_string(),
            ImageRef::Key(key) => self.bucket.public_url(key),
        }
    }

    /// Upload an inline base64 data URL and return its new key.
    ///
    /// Any other reference, including a data URL without a base64 payload,
    /// is returned unchanged without touching the bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the data URL is malformed or the upload fails.
    #[instrument(skip_all)]
    pub async fn store(&self, reference: &str) -> Result<String, ImageError> {
        let ImageRef::Inline(data_url) = ImageRef::classify(reference) else {
            return Ok(reference.to_string());
        };

        let DataUrl { mime, bytes } = DataUrl::parse(data_url)?;
        let key = generate_key(extension_for(&mime));
        let size = bytes.len();

        self.bucket
            .upload(&key, bytes, &mime)
            .await
            .map_err(ImageError::Upload)?;

        tracing::info!(key = %key, mime = %mime, size, "Uploaded image");
        Ok(key)
    }

    /// Store every reference in `references`, replacing inline data with
    /// keys in place.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failure. References uploaded before
    /// the failure stay in the bucket.
    pub async fn store_all(&self, references: &mut [String]) -> Result<(), ImageError> {
        for reference in references.iter_mut() {
            if matches!(ImageRef::classify(reference), ImageRef::Inline(_)) {
                *reference = self.store(reference).await?;
            }
        }
        Ok(())
    }

    /// Delete a bucket object. Empty references, URLs and data URLs are
    /// ignored. Failures are logged, not returned.
    #[instrument(skip(self))]
    pub async fn delete(&self, reference: &str) {
        let ImageRef::Key(key) = ImageRef::classify(reference) else {
            return;
        };
        match self.bucket.remove(&[key.to_string()]).await {
            Ok(()) => tracing::info!(key, "Deleted image"),
            Err(e) => tracing::warn!(key, error = %e, "Failed to delete image"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";
    const SVG_TEXT: &str = "data:image/svg+xml,%3Csvg%3E%3C/svg%3E";

    fn store() -> ImageStore<MemoryBucket> {
        ImageStore::new(
            MemoryBucket::new("http://localhost:3000/media"),
            "/static/placeholder.svg",
        )
    }

    #[test]
    fn test_resolve_classes() {
        let images = store();
        assert_eq!(images.resolve(""), "/static/placeholder.svg");
        assert_eq!(images.resolve_or("  ", "/other.png"), "/other.png");
        assert_eq!(
            images.resolve("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(images.resolve(PIXEL), PIXEL);
        assert_eq!(
            images.resolve("1700000000000-abcd1234.png"),
            "http://localhost:3000/media/1700000000000-abcd1234.png"
        );
    }

    #[test]
    fn test_resolve_is_idempotent_on_resolved_values() {
        let images = store();
        let url = images.resolve("https://cdn.example.com/a.jpg");
        assert_eq!(images.resolve(&url), url);
    }

    #[test]
    fn test_resolve_returns_urls_verbatim() {
        let images = store();
        let padded = " https://cdn.example.com/x.png";
        assert_eq!(images.resolve(padded), padded);
        let inline = format!("{PIXEL} ");
        assert_eq!(images.resolve(&inline), inline);
    }

    #[test]
    fn test_classify_data_urls() {
        assert!(matches!(ImageRef::classify(PIXEL), ImageRef::Inline(_)));
        assert!(matches!(
            ImageRef::classify("data:image/png;charset=x;BASE64,AAAA"),
            ImageRef::Inline(_)
        ));
        assert!(matches!(ImageRef::classify(SVG_TEXT), ImageRef::Url(_)));
    }

    #[test]
    fn test_data_url_parse() {
        let parsed = DataUrl::parse(PIXEL).unwrap();
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(parsed.extension(), "png");
        assert_eq!(&parsed.bytes[..4], &[0x89, b'P', b'N', b'G']);

        assert!(matches!(
            DataUrl::parse("data:image/png,plain"),
            Err(ImageError::MalformedDataUrl(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64"),
            Err(ImageError::MalformedDataUrl(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,@@@"),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/svg+xml"), "svg");
        assert_eq!(extension_for("image/avif"), "avif");
        assert_eq!(extension_for("application/pdf"), "bin");
    }

    #[test]
    fn test_generated_key_shape() {
        let key = generate_key("webp");
        let (stem, ext) = key.rsplit_once('.').unwrap();
        assert_eq!(ext, "webp");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), KEY_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_store_passes_non_data_through() {
        let images = store();
        for input in [
            "",
            "https://x.test/a.png",
            "1700000000000-abcd1234.png",
            SVG_TEXT,
        ] {
            assert_eq!(images.store(input).await.unwrap(), input);
        }
        assert!(images.bucket().is_empty());
    }

    #[tokio::test]
    async fn test_store_uploads_inline_data() {
        let images = store();
        let key = images.store(PIXEL).await.unwrap();
        assert!(key.ends_with(".png"));
        let object = images.bucket().get(&key).unwrap();
        assert_eq!(object.content_type, "image/png");
        // Storing the key again is a no-op.
        assert_eq!(images.store(&key).await.unwrap(), key);
        assert_eq!(images.bucket().len(), 1);
    }

    #[tokio::test]
    async fn test_store_surfaces_upload_failure() {
        let images = store();
        images.bucket().set_fail_uploads(true);
        let err = images.store(PIXEL).await.unwrap_err();
        assert!(matches!(err, ImageError::Upload(BucketError::Rejected(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_store_all_replaces_inline_entries() {
        let images = store();
        let mut refs = vec!["https://x.test/a.png".to_string(), PIXEL.to_string()];
        images.store_all(&mut refs).await.unwrap();
        assert_eq!(refs[0], "https://x.test/a.png");
        assert!(images.bucket().contains(&refs[1]));
    }

    #[tokio::test]
    async fn test_delete_only_touches_keys_and_swallows_failures() {
        let images = store();
        let key = images.store(PIXEL).await.unwrap();

        images.delete("https://x.test/a.png").await;
        images.delete(SVG_TEXT).await;
        images.delete("").await;
        assert!(images.bucket().contains(&key));

        images.bucket().set_fail_removals(true);
        images.delete(&key).await;
        assert!(images.bucket().contains(&key));

        images.bucket().set_fail_removals(false);
        images.delete(&key).await;
        assert!(!images.bucket().contains(&key));
    }
}
