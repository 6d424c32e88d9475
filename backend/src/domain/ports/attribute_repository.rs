//! Port abstraction for tag/ingredient persistence adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::attribute::{Attribute, AttributeKind, AttributeName};

/// Persistence errors raised by attribute repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributePersistenceError {
    /// Repository connection could not be established.
    #[error("attribute repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("attribute repository query failed: {message}")]
    Query { message: String },
}

impl AttributePersistenceError {
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

#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Resolve `(owner, kind, name)` to an existing record, creating one when
    /// absent. Concurrent callers converge on the same row.
    async fn get_or_create(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributePersistenceError>;

    /// List the owner's attributes of one kind, ordered by descending name.
    /// With `assigned_only` set, restrict to attributes attached to at least
    /// one recipe, without duplicates.
    async fn list_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributePersistenceError>;

    /// Rename an attribute owned by `owner`; `None` when no such row exists.
    async fn rename_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
        name: AttributeName,
    ) -> Result<Option<Attribute>, AttributePersistenceError>;

    /// Delete an attribute owned by `owner`; `false` when no such row exists.
    async fn delete_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
    ) -> Result<bool, AttributePersistenceError>;
}
