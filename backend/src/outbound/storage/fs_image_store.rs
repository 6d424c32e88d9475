//! Filesystem-backed `ImageStore` implementation.
//!
//! Blobs land in a flat media directory under a random key with the
//! extension derived from the upload's content type, so the key never
//! reveals anything about the client's filename.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, StoredImage};

/// Map a content type to its storage extension.
fn extension_for(content_type: &str) -> Option<&'static str> {
    // Parameters such as "; charset=..." never apply to these types, but be
    // tolerant of them anyway.
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    match essence {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Image store writing blobs under a media root directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Create a store rooted at `root`. The directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError> {
        let extension =
            extension_for(content_type).ok_or_else(|| ImageStoreError::unsupported(content_type))?;
        let key = format!("{}.{extension}", Uuid::new_v4());

        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ImageStoreError::storage(err.to_string()))?;
        fs::write(self.path_for(&key), bytes)
            .await
            .map_err(|err| ImageStoreError::storage(err.to_string()))?;

        debug!(key = %key, size = bytes.len(), "stored image blob");
        Ok(StoredImage { key })
    }

    async fn remove(&self, key: &str) -> Result<(), ImageStoreError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImageStoreError::storage(err.to_string())),
        }
    }
}
