//! Port abstractions decoupling the domain from persistence and storage.
//!
//! Each port is an async trait implemented by an outbound adapter (Diesel
//! repositories, the filesystem image store) and by in-memory doubles in the
//! integration tests.

mod attribute_repository;
mod image_store;
mod recipe_repository;
mod token_repository;
mod user_repository;

pub use attribute_repository::{AttributeRepository, AttributePersistenceError};
pub use image_store::{ImageStore, ImageStoreError, StoredImage};
pub use recipe_repository::{RecipeFilter, RecipePersistenceError, RecipeRepository};
pub use token_repository::{AccessToken, AccessTokenRepository, TokenPersistenceError};
pub use user_repository::{ProfileChanges, UserPersistenceError, UserRepository};

use super::error::Error;

/// Shared mapping from adapter failures to the transport-agnostic error.
///
/// Adapter details are logged at the call site; clients only see a generic
/// internal failure.
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> Error {
    tracing::error!(error = %err, context, "port operation failed");
    Error::internal(format!("{context} failed"))
}
