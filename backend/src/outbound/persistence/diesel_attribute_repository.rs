//! PostgreSQL-backed `AttributeRepository` implementation using Diesel.
//!
//! Get-or-create relies on the `(user_id, kind, name)` uniqueness constraint
//! with a conflict-tolerant insert, so concurrent reconciliation of the same
//! name converges on a single row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::attribute::{Attribute, AttributeKind, AttributeName};
use crate::domain::ports::{AttributePersistenceError, AttributeRepository};

use super::error_map::{classify, classify_pool, DieselFailure};
use super::models::AttributeRow;
use super::pool::DbPool;
use super::schema::{attributes, recipe_attributes};

/// Diesel-backed implementation of the `AttributeRepository` port.
#[derive(Clone)]
pub struct DieselAttributeRepository {
    pool: DbPool,
}

impl DieselAttributeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> AttributePersistenceError {
    match failure {
        DieselFailure::Connection(message) => AttributePersistenceError::connection(message),
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            AttributePersistenceError::query(message)
        }
    }
}

fn map_row(row: AttributeRow) -> Result<Attribute, AttributePersistenceError> {
    row.into_domain()
        .map_err(|err| AttributePersistenceError::query(err.to_string()))
}

#[async_trait]
impl AttributeRepository for DieselAttributeRepository {
    async fn get_or_create(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let candidate = Attribute::new(owner, kind, name.clone());
        diesel::insert_into(attributes::table)
            .values(AttributeRow::from_domain(&candidate))
            .on_conflict((attributes::user_id, attributes::kind, attributes::name))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(classify(err)))?;

        let row: AttributeRow = attributes::table
            .filter(attributes::user_id.eq(owner))
            .filter(attributes::kind.eq(kind.as_str()))
            .filter(attributes::name.eq(name.as_ref()))
            .select(AttributeRow::as_select())
            .first(&mut conn)
            .await
            .map_err(|err| map_failure(classify(err)))?;

        map_row(row)
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let mut query = attributes::table
            .filter(attributes::user_id.eq(owner))
            .filter(attributes::kind.eq(kind.as_str()))
            .select(AttributeRow::as_select())
            .into_boxed();

        if assigned_only {
            // Membership in the association table rather than a join keeps
            // the result free of duplicates.
            query = query.filter(
                attributes::id.eq_any(recipe_attributes::table.select(recipe_attributes::attribute_id)),
            );
        }

        let rows: Vec<AttributeRow> = query
            .order(attributes::name.desc())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify(err)))?;

        rows.into_iter().map(map_row).collect()
    }

    async fn rename_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
        name: AttributeName,
    ) -> Result<Option<Attribute>, AttributePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let row: Option<AttributeRow> = diesel::update(
            attributes::table
                .filter(attributes::id.eq(id))
                .filter(attributes::user_id.eq(owner))
                .filter(attributes::kind.eq(kind.as_str())),
        )
        .set(attributes::name.eq(name.as_ref()))
        .returning(AttributeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_failure(classify(err)))?;

        row.map(map_row).transpose()
    }

    async fn delete_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
    ) -> Result<bool, AttributePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let deleted = diesel::delete(
            attributes::table
                .filter(attributes::id.eq(id))
                .filter(attributes::user_id.eq(owner))
                .filter(attributes::kind.eq(kind.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_failure(classify(err)))?;

        Ok(deleted > 0)
    }
}
