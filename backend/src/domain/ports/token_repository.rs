//! Port abstraction for access-token persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::User;

/// Persistence errors raised by token repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenPersistenceError {
    /// Repository connection could not be established.
    #[error("token repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("token repository query failed: {message}")]
    Query { message: String },
}

impl TokenPersistenceError {
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

/// Stored access token. Only the SHA-256 digest of the token value is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_digest: String,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    /// Record a freshly issued token digest for a user.
    pub fn new(user_id: Uuid, token_digest: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_digest,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    /// Persist a newly issued token.
    async fn insert(&self, token: &AccessToken) -> Result<(), TokenPersistenceError>;

    /// Resolve a token digest to its active owner, if any.
    ///
    /// Tokens belonging to deactivated accounts resolve to `None` so the
    /// caller cannot distinguish them from unknown tokens.
    async fn find_active_user(
        &self,
        token_digest: &str,
    ) -> Result<Option<User>, TokenPersistenceError>;
}
