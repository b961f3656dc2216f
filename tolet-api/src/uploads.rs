/// Listing image storage
///
/// Handlers hand uploaded image bytes to an [`ImageStore`] and persist the
/// references it returns. [`DiskImageStore`] writes files into the upload
/// directory, which the router serves under `/uploads`.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Public path prefix under which stored images are served
pub const UPLOAD_ROUTE: &str = "/uploads";

/// Most images accepted for one listing
pub const MAX_IMAGES_PER_LISTING: usize = 5;

/// Error type for image storage
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// More image files than a listing may carry
    #[error("At most {max} images may be uploaded per listing")]
    TooManyImages { max: usize },

    /// The store could not persist the image
    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file before it is stored
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, if any
    pub file_name: Option<String>,

    pub content_type: Option<String>,

    pub data: Bytes,
}

/// Destination for listing images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists one image and returns the reference stored on the listing
    async fn store(&self, upload: ImageUpload) -> Result<String, UploadError>;

    /// Deletes an image previously returned by [`ImageStore::store`]
    ///
    /// Unknown references are not an error.
    async fn remove(&self, reference: &str) -> Result<(), UploadError>;
}

/// Removes every stored image, logging the ones that could not be deleted
pub async fn discard_images(store: &dyn ImageStore, references: &[String]) {
    for reference in references {
        if let Err(e) = store.remove(reference).await {
            tracing::warn!(reference = %reference, error = %e, "Failed to discard listing image");
        }
    }
}

/// Stores images as files in a local directory
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    dir: PathBuf,
}

impl DiskImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, UploadError> {
        let file_name = format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_file_name(upload.file_name.as_deref().unwrap_or("image"))
        );

        tokio::fs::write(self.dir.join(&file_name), &upload.data).await?;

        tracing::debug!(
            file = %file_name,
            bytes = upload.data.len(),
            content_type = ?upload.content_type,
            "Stored listing image"
        );

        Ok(format!("{}/{}", UPLOAD_ROUTE, file_name))
    }

    async fn remove(&self, reference: &str) -> Result<(), UploadError> {
        // Only names this store could have produced
        let Some(file_name) = reference
            .strip_prefix(UPLOAD_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| sanitize_file_name(name) == *name)
        else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "Removed listing image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduces a client file name to a safe single path component
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`. Names that end up empty or dot-only become `image`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        "image".to_string()
    } else {
        cleaned
    }
}
