//! Object storage adapter for photo assets.
//!
//! Every upload lives under three sibling keys that differ only in their
//! second path segment: `photos/original/...`, `photos/thumbnail/...` and
//! `photos/preview/...`.

use pic4pick_common::{AppError, AppResult, StorageService, generate_storage_key};
use serde::Serialize;
use tracing::{info, warn};

use super::media::{self, MediaService, RenderedVariant};

pub const ORIGINAL_PREFIX: &str = "photos/original/";
pub const THUMBNAIL_PREFIX: &str = "photos/thumbnail/";
pub const PREVIEW_PREFIX: &str = "photos/preview/";

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Keys and URLs of a stored upload. Variant fields are `None` when they
/// could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPhoto {
    pub oss_key: String,
    pub oss_url: String,
    pub thumbnail_key: Option<String>,
    pub thumbnail_url: Option<String>,
    pub preview_key: Option<String>,
    pub preview_url: Option<String>,
}

/// Outcome of removing a photo's objects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageCleanup {
    pub attempted: Vec<String>,
    /// Keys whose deletion failed and are now orphaned.
    pub failed: Vec<String>,
}

impl StorageCleanup {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Thumbnail and preview keys for an original key, if it follows the layout.
#[must_use]
pub fn sibling_keys(original_key: &str) -> Option<(String, String)> {
    let rest = original_key.strip_prefix(ORIGINAL_PREFIX)?;
    Some((
        format!("{THUMBNAIL_PREFIX}{rest}"),
        format!("{PREVIEW_PREFIX}{rest}"),
    ))
}

/// Photo asset storage.
#[derive(Clone)]
pub struct PhotoStorage {
    backend: StorageService,
    media: MediaService,
}

impl PhotoStorage {
    /// Create a new photo storage adapter.
    #[must_use]
    pub const fn new(backend: StorageService, media: MediaService) -> Self {
        Self { backend, media }
    }

    /// Upload an original and its variants.
    ///
    /// Only the original upload can fail the call. Variant problems are
    /// logged and leave the variant fields empty.
    pub async fn upload_buffer(&self, data: Vec<u8>, extension: &str) -> AppResult<StoredPhoto> {
        let extension = extension.to_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported file type: .{extension}"
            )));
        }
        let content_type = media::content_type_for_extension(&extension);

        let oss_key = generate_storage_key(ORIGINAL_PREFIX, &extension);
        let original = self.backend.upload(&oss_key, &data, content_type).await?;
        info!(key = %oss_key, size = original.size, "Uploaded original");

        let mut stored = StoredPhoto {
            oss_key,
            oss_url: original.url,
            thumbnail_key: None,
            thumbnail_url: None,
            preview_key: None,
            preview_url: None,
        };

        let Some(format) = media::format_for_extension(&extension) else {
            return Ok(stored);
        };
        let Some((thumbnail_key, preview_key)) = sibling_keys(&stored.oss_key) else {
            return Ok(stored);
        };

        let media = self.media;
        let rendered =
            tokio::task::spawn_blocking(move || media.render_variants(&data, format)).await;
        let variants = match rendered {
            Ok(Ok(variants)) => variants,
            Ok(Err(e)) => {
                warn!(key = %stored.oss_key, error = %e, "Variant generation failed, storing original only");
                return Ok(stored);
            }
            Err(e) => {
                warn!(key = %stored.oss_key, error = %e, "Variant task failed, storing original only");
                return Ok(stored);
            }
        };

        if let Some(url) = self
            .upload_variant(&thumbnail_key, &variants.thumbnail, content_type)
            .await
        {
            stored.thumbnail_key = Some(thumbnail_key);
            stored.thumbnail_url = Some(url);
        }
        if let Some(url) = self
            .upload_variant(&preview_key, &variants.preview, content_type)
            .await
        {
            stored.preview_key = Some(preview_key);
            stored.preview_url = Some(url);
        }

        Ok(stored)
    }

    async fn upload_variant(
        &self,
        key: &str,
        variant: &RenderedVariant,
        content_type: &str,
    ) -> Option<String> {
        match self.backend.upload(key, &variant.data, content_type).await {
            Ok(uploaded) => Some(uploaded.url),
            Err(e) => {
                warn!(key = %key, error = %e, "Variant upload failed");
                None
            }
        }
    }

    /// Delete the original and both siblings. Every deletion is attempted.
    pub async fn delete_photo_assets(&self, original_key: &str) -> StorageCleanup {
        let mut keys = vec![original_key.to_string()];
        if let Some((thumbnail, preview)) = sibling_keys(original_key) {
            keys.push(thumbnail);
            keys.push(preview);
        }

        let mut cleanup = StorageCleanup::default();
        for key in keys {
            if let Err(e) = self.backend.delete(&key).await {
                warn!(key = %key, error = %e, "Failed to delete photo object");
                cleanup.failed.push(key.clone());
            }
            cleanup.attempted.push(key);
        }
        cleanup
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use pic4pick_common::{StorageBackend, UploadedFile, config::MediaConfig};
    use std::sync::{Arc, Mutex};

    /// In-memory backend that records calls and can fail chosen keys.
    #[derive(Default)]
    pub struct RecordingStorage {
        pub uploads: Mutex<Vec<String>>,
        pub deletes: Mutex<Vec<String>>,
        pub fail_on: Vec<String>,
    }

    #[async_trait::async_trait]
    impl StorageBackend for RecordingStorage {
        async fn upload(
            &self,
            key: &str,
            data: &[u8],
            _content_type: &str,
        ) -> AppResult<UploadedFile> {
            if self.fail_on.iter().any(|prefix| key.starts_with(prefix)) {
                return Err(AppError::Storage("injected failure".to_string()));
            }
            self.uploads.lock().unwrap().push(key.to_string());
            Ok(UploadedFile {
                key: key.to_string(),
                url: self.public_url(key),
                size: data.len() as u64,
            })
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.deletes.lock().unwrap().push(key.to_string());
            if self.fail_on.iter().any(|prefix| key.starts_with(prefix)) {
                return Err(AppError::Storage("injected failure".to_string()));
            }
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://cdn.example.com/{key}")
        }
    }

    pub fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(64, 32, image::Rgba([10, 20, 30, 255]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn storage_with(backend: Arc<RecordingStorage>) -> PhotoStorage {
        PhotoStorage::new(backend, MediaService::new(MediaConfig::default()))
    }

    #[test]
    fn test_sibling_keys() {
        let (thumbnail, preview) = sibling_keys("photos/original/2024/05/abc.jpg").unwrap();
        assert_eq!(thumbnail, "photos/thumbnail/2024/05/abc.jpg");
        assert_eq!(preview, "photos/preview/2024/05/abc.jpg");
        assert!(sibling_keys("legacy/abc.jpg").is_none());
    }

    #[tokio::test]
    async fn test_upload_produces_three_objects() {
        let backend = Arc::new(RecordingStorage::default());
        let storage = storage_with(backend.clone());

        let stored = storage.upload_buffer(png_bytes(), "PNG").await.unwrap();

        assert!(stored.oss_key.starts_with(ORIGINAL_PREFIX));
        assert!(stored.oss_key.ends_with(".png"));
        let (thumbnail, preview) = sibling_keys(&stored.oss_key).unwrap();
        assert_eq!(stored.thumbnail_key.as_deref(), Some(thumbnail.as_str()));
        assert_eq!(stored.preview_key.as_deref(), Some(preview.as_str()));
        assert_eq!(backend.uploads.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_undecodable_upload_keeps_original_only() {
        let backend = Arc::new(RecordingStorage::default());
        let storage = storage_with(backend.clone());

        let stored = storage
            .upload_buffer(b"not really a jpeg".to_vec(), "jpg")
            .await
            .unwrap();

        assert!(stored.thumbnail_url.is_none());
        assert!(stored.preview_url.is_none());
        assert_eq!(backend.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let storage = storage_with(Arc::new(RecordingStorage::default()));
        let result = storage.upload_buffer(png_bytes(), "exe").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_attempts_all_keys_even_after_failure() {
        let backend = Arc::new(RecordingStorage {
            fail_on: vec![THUMBNAIL_PREFIX.to_string()],
            ..Default::default()
        });
        let storage = storage_with(backend.clone());

        let cleanup = storage
            .delete_photo_assets("photos/original/2024/05/abc.jpg")
            .await;

        assert_eq!(cleanup.attempted.len(), 3);
        assert_eq!(cleanup.failed, vec!["photos/thumbnail/2024/05/abc.jpg"]);
        assert!(!cleanup.is_clean());
        assert_eq!(
            *backend.deletes.lock().unwrap(),
            vec![
                "photos/original/2024/05/abc.jpg",
                "photos/thumbnail/2024/05/abc.jpg",
                "photos/preview/2024/05/abc.jpg",
            ]
        );
    }
}
