//! PostgreSQL-backed `AccessTokenRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccessToken, AccessTokenRepository, TokenPersistenceError};
use crate::domain::user::User;

use super::error_map::{classify, classify_pool, DieselFailure};
use super::models::{AccessTokenRow, UserRow};
use super::pool::DbPool;
use super::schema::{access_tokens, users};

/// Diesel-backed implementation of the `AccessTokenRepository` port.
#[derive(Clone)]
pub struct DieselAccessTokenRepository {
    pool: DbPool,
}

impl DieselAccessTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> TokenPersistenceError {
    match failure {
        DieselFailure::Connection(message) => TokenPersistenceError::connection(message),
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            TokenPersistenceError::query(message)
        }
    }
}

#[async_trait]
impl AccessTokenRepository for DieselAccessTokenRepository {
    async fn insert(&self, token: &AccessToken) -> Result<(), TokenPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        diesel::insert_into(access_tokens::table)
            .values(AccessTokenRow::from_domain(token))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_failure(classify(err)))
    }

    async fn find_active_user(
        &self,
        token_digest: &str,
    ) -> Result<Option<User>, TokenPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(classify_pool(err)))?;

        let row: Option<UserRow> = access_tokens::table
            .inner_join(users::table)
            .filter(access_tokens::token_digest.eq(token_digest))
            .filter(users::is_active.eq(true))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify(err)))?;

        row.map(|row| {
            row.into_domain()
                .map_err(|err| TokenPersistenceError::query(err.to_string()))
        })
        .transpose()
    }
}
