//! Port abstraction for recipe persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::attribute::AttributeKind;
use crate::domain::recipe::Recipe;

/// Persistence errors raised by recipe repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipePersistenceError {
    /// Repository connection could not be established.
    #[error("recipe repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("recipe repository query failed: {message}")]
    Query { message: String },
}

impl RecipePersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Optional attribute-id filters for recipe listings. A recipe matches when
/// its tag set intersects `tag_ids` and its ingredient set intersects
/// `ingredient_ids`; an unset filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tag_ids: Option<Vec<Uuid>>,
    pub ingredient_ids: Option<Vec<Uuid>>,
}

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a new recipe row (without associations).
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// List the owner's recipes, newest first, applying the filter without
    /// duplicates. Attached tags and ingredients are loaded.
    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError>;

    /// Fetch one recipe owned by `owner`, with associations loaded.
    async fn find_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Recipe>, RecipePersistenceError>;

    /// Update the scalar columns of an existing recipe row.
    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError>;

    /// Delete a recipe owned by `owner`; `false` when no such row exists.
    async fn delete_for_owner(&self, owner: Uuid, id: Uuid)
        -> Result<bool, RecipePersistenceError>;

    /// Replace the recipe's associations of one kind with the given
    /// attribute ids. An empty slice clears them. Duplicate ids collapse.
    async fn set_associations(
        &self,
        recipe_id: Uuid,
        kind: AttributeKind,
        attribute_ids: &[Uuid],
    ) -> Result<(), RecipePersistenceError>;

    /// Record the stored image key for a recipe owned by `owner`, returning
    /// the previous key, or `None` when the recipe does not exist.
    async fn replace_image_key(
        &self,
        owner: Uuid,
        id: Uuid,
        image_key: &str,
    ) -> Result<Option<Option<String>>, RecipePersistenceError>;
}
