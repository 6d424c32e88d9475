//! PostgreSQL-backed `RecipeRepository` implementation using Diesel.
//!
//! Listings are ownership-scoped before any id lookup, and the attribute-id
//! filters are expressed as membership subqueries so filtered results never
//! contain duplicates.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::attribute::{Attribute, AttributeKind};
use crate::domain::ports::{RecipeFilter, RecipePersistenceError, RecipeRepository};
use crate::domain::recipe::Recipe;

use super::error_map::{classify, classify_pool, DieselFailure};
use super::models::{AttributeRow, RecipeAttributeRow, RecipeChangeset, RecipeRow};
use super::pool::DbPool;
use super::schema::{attributes, recipe_attributes, recipes};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> RecipePersistenceError {
    match failure {
        DieselFailure::Connection(message) => RecipePersistenceError::connection(message),
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            RecipePersistenceError::query(message)
        }
    }
}

/// Load attached attributes for a set of recipes, grouped by recipe id.
async fn load_attribute_map(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Attribute>>, RecipePersistenceError> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, AttributeRow)> = recipe_attributes::table
        .inner_join(attributes::table)
        .filter(recipe_attributes::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((recipe_attributes::recipe_id, AttributeRow::as_select()))
        .load(conn)
        .await
        .map_err(|err| map_failure(classify(err)))?;

    let mut grouped: HashMap<Uuid, Vec<Attribute>> = HashMap::new();
    for (recipe_id, row) in rows {
        let attribute = row
            .into_domain()
            .map_err(|err| RecipePersistenceError::query(err.to_string()))?;
        grouped.entry(recipe_id).or_default().push(attribute);
    }
    Ok(grouped)
}

fn hydrate(row: RecipeRow, attached: Vec<Attribute>) -> Recipe {
    let (tags, ingredients) = attached
        .into_iter()
        .partition(|attribute| attribute.kind == AttributeKind::Tag);
    row.into_domain(tags, ingredients)
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        diesel::insert_into(recipes::table)
            .values(RecipeRow::from_domain(recipe))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(classify(err)))
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let mut query = recipes::table
            .filter(recipes::user_id.eq(owner))
            .select(RecipeRow::as_select())
            .into_boxed();

        if let Some(tag_ids) = &filter.tag_ids {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_attributes::table
                        .select(recipe_attributes::recipe_id)
                        .filter(recipe_attributes::attribute_id.eq_any(tag_ids.clone())),
                ),
            );
        }
        if let Some(ingredient_ids) = &filter.ingredient_ids {
            query = query.filter(
                recipes::id.eq_any(
                    recipe_attributes::table
                        .select(recipe_attributes::recipe_id)
                        .filter(recipe_attributes::attribute_id.eq_any(ingredient_ids.clone())),
                ),
            );
        }

        let rows: Vec<RecipeRow> = query
            .order(recipes::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify(err)))?;

        let recipe_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut attribute_map = load_attribute_map(&mut conn, &recipe_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let attached = attribute_map.remove(&row.id).unwrap_or_default();
                hydrate(row, attached)
            })
            .collect())
    }

    async fn find_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::user_id.eq(owner))
            .filter(recipes::id.eq(id))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify(err)))?;

        match row {
            None => Ok(None),
            Some(row) => {
                let mut attribute_map = load_attribute_map(&mut conn, &[row.id]).await?;
                let attached = attribute_map.remove(&row.id).unwrap_or_default();
                Ok(Some(hydrate(row, attached)))
            }
        }
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        diesel::update(recipes::table.find(recipe.id))
            .set(RecipeChangeset::from_domain(recipe))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(classify(err)))
    }

    async fn delete_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<bool, RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::user_id.eq(owner))
                .filter(recipes::id.eq(id)),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_failure(classify(err)))?;

        Ok(deleted > 0)
    }

    async fn set_associations(
        &self,
        recipe_id: Uuid,
        kind: AttributeKind,
        attribute_ids: &[Uuid],
    ) -> Result<(), RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let rows: Vec<RecipeAttributeRow> = attribute_ids
            .iter()
            .map(|attribute_id| RecipeAttributeRow {
                recipe_id,
                attribute_id: *attribute_id,
            })
            .collect();
        let kind_str = kind.as_str();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                // Clear only the associations of this kind; the other kind's
                // set is untouched.
                diesel::delete(
                    recipe_attributes::table
                        .filter(recipe_attributes::recipe_id.eq(recipe_id))
                        .filter(
                            recipe_attributes::attribute_id.eq_any(
                                attributes::table
                                    .select(attributes::id)
                                    .filter(attributes::kind.eq(kind_str)),
                            ),
                        ),
                )
                .execute(conn)
                .await?;

                diesel::insert_into(recipe_attributes::table)
                    .values(&rows)
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_failure(classify(err)))
    }

    async fn replace_image_key(
        &self,
        owner: Uuid,
        id: Uuid,
        image_key: &str,
    ) -> Result<Option<Option<String>>, RecipePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let scoped = recipes::table
            .filter(recipes::user_id.eq(owner))
            .filter(recipes::id.eq(id));

        let previous: Option<Option<String>> = scoped
            .select(recipes::image_key)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify(err)))?;

        let Some(previous) = previous else {
            return Ok(None);
        };

        diesel::update(
            recipes::table
                .filter(recipes::user_id.eq(owner))
                .filter(recipes::id.eq(id)),
        )
        .set(recipes::image_key.eq(image_key))
        .execute(&mut conn)
        .await
        .map_err(|err| map_failure(classify(err)))?;

        Ok(Some(previous))
    }
}
