//! Port abstraction for recipe image blob storage.

use async_trait::async_trait;

/// Errors raised by image store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// The upload's content type has no known image extension.
    #[error("unsupported image content type: {content_type}")]
    UnsupportedContentType { content_type: String },
    /// Reading or writing the underlying storage failed.
    #[error("image storage failed: {message}")]
    Storage { message: String },
}

impl ImageStoreError {
    /// Create an unsupported-content-type error.
    pub fn unsupported(content_type: impl Into<String>) -> Self {
        Self::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }

    /// Create a storage error with the given message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// Handle for a stored image blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Storage key: a random identifier plus the preserved extension.
    pub key: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an image blob, deriving the extension from `content_type`.
    /// The generated key is independent of any client-supplied name.
    async fn store(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError>;

    /// Remove a previously stored blob. Unknown keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), ImageStoreError>;
}
