//! Recipe use-cases: ownership-scoped CRUD, tag/ingredient reconciliation,
//! and image association.
//!
//! Reconciliation resolves each embedded name to the owner's existing record
//! when one matches exactly, creating it otherwise, and replaces the
//! recipe's association set in one pass. Missing rows and cross-owner access
//! both surface as `not_found`.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::attribute::{AttributeKind, AttributeName};
use super::error::Error;
use super::ports::{
    internal_error, AttributeRepository, ImageStore, ImageStoreError, RecipeFilter,
    RecipeRepository,
};
use super::recipe::{Recipe, RecipeDraft, RecipeUpdate};

/// Application service bundling the recipe ports.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    attributes: Arc<dyn AttributeRepository>,
    images: Arc<dyn ImageStore>,
}

impl RecipeService {
    /// Construct the service from its ports.
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        attributes: Arc<dyn AttributeRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            recipes,
            attributes,
            images,
        }
    }

    /// List the owner's recipes, newest first, applying optional filters.
    pub async fn list(&self, owner: Uuid, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list_for_owner(owner, filter)
            .await
            .map_err(|err| internal_error("listing recipes", err))
    }

    /// Fetch one recipe owned by `owner`.
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Recipe, Error> {
        self.recipes
            .find_for_owner(owner, id)
            .await
            .map_err(|err| internal_error("loading recipe", err))?
            .ok_or_else(|| Error::not_found("recipe not found"))
    }

    /// Create a recipe and reconcile its embedded tag and ingredient names.
    pub async fn create(&self, owner: Uuid, draft: RecipeDraft) -> Result<Recipe, Error> {
        let tags = draft.tags.clone();
        let ingredients = draft.ingredients.clone();
        let recipe = draft.into_recipe(owner);
        let id = recipe.id;

        self.recipes
            .insert(&recipe)
            .await
            .map_err(|err| internal_error("creating recipe", err))?;

        self.reconcile(owner, id, AttributeKind::Tag, &tags).await?;
        self.reconcile(owner, id, AttributeKind::Ingredient, &ingredients)
            .await?;

        self.get(owner, id).await
    }

    /// Apply a partial or full update to one of the owner's recipes.
    ///
    /// Attribute lists are reconciled only when present; a present-but-empty
    /// list clears the associations while leaving the records themselves in
    /// place.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        update: RecipeUpdate,
    ) -> Result<Recipe, Error> {
        update
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let mut recipe = self.get(owner, id).await?;
        update.apply_to(&mut recipe);
        self.recipes
            .update(&recipe)
            .await
            .map_err(|err| internal_error("updating recipe", err))?;

        if let Some(tags) = &update.tags {
            self.reconcile(owner, id, AttributeKind::Tag, tags).await?;
        }
        if let Some(ingredients) = &update.ingredients {
            self.reconcile(owner, id, AttributeKind::Ingredient, ingredients)
                .await?;
        }

        self.get(owner, id).await
    }

    /// Delete one of the owner's recipes.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .recipes
            .delete_for_owner(owner, id)
            .await
            .map_err(|err| internal_error("deleting recipe", err))?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("recipe not found"))
        }
    }

    /// Store an uploaded image and attach it to the recipe, replacing and
    /// removing any previous blob.
    pub async fn attach_image(
        &self,
        owner: Uuid,
        id: Uuid,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Recipe, Error> {
        let stored = self
            .images
            .store(content_type, bytes)
            .await
            .map_err(map_image_error)?;

        let previous = self
            .recipes
            .replace_image_key(owner, id, &stored.key)
            .await
            .map_err(|err| internal_error("attaching recipe image", err))?;

        match previous {
            None => {
                // The recipe vanished under us; do not leak the orphan blob.
                if let Err(err) = self.images.remove(&stored.key).await {
                    debug!(key = %stored.key, error = %err, "orphan image cleanup failed");
                }
                Err(Error::not_found("recipe not found"))
            }
            Some(Some(old_key)) if old_key != stored.key => {
                if let Err(err) = self.images.remove(&old_key).await {
                    debug!(key = %old_key, error = %err, "stale image cleanup failed");
                }
                self.get(owner, id).await
            }
            Some(_) => self.get(owner, id).await,
        }
    }

    /// Get-or-create every name for the owner and replace the recipe's
    /// association set of that kind. Duplicate names collapse onto one row.
    async fn reconcile(
        &self,
        owner: Uuid,
        recipe_id: Uuid,
        kind: AttributeKind,
        names: &[AttributeName],
    ) -> Result<(), Error> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let attribute = self
                .attributes
                .get_or_create(owner, kind, name)
                .await
                .map_err(|err| internal_error("resolving attribute", err))?;
            if !ids.contains(&attribute.id) {
                ids.push(attribute.id);
            }
        }

        debug!(recipe = %recipe_id, kind = %kind, count = ids.len(), "reconciled attributes");
        self.recipes
            .set_associations(recipe_id, kind, &ids)
            .await
            .map_err(|err| internal_error("associating attributes", err))
    }
}

fn map_image_error(err: ImageStoreError) -> Error {
    match err {
        ImageStoreError::UnsupportedContentType { .. } => Error::invalid_request(err.to_string()),
        ImageStoreError::Storage { .. } => internal_error("storing image", err),
    }
}
