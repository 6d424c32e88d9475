//! Tags and ingredients.
//!
//! Both are name-bearing records owned by a single user and attached to
//! recipes through a shared association table. They differ only in kind, so
//! one model and one capability set {list, rename, delete} covers both.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates the two attribute flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    /// Stable string form used in storage and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Ingredient => "ingredient",
        }
    }

}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for AttributeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for AttributeValidationError {}

/// Maximum stored length for an attribute name.
pub const ATTRIBUTE_NAME_MAX: usize = 255;

/// Validated tag/ingredient name. Matching is exact, including case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeName(String);

impl AttributeName {
    /// Validate and construct an [`AttributeName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, AttributeValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AttributeValidationError::EmptyName);
        }
        if raw.chars().count() > ATTRIBUTE_NAME_MAX {
            return Err(AttributeValidationError::NameTooLong {
                max: ATTRIBUTE_NAME_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AttributeName> for String {
    fn from(value: AttributeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AttributeName {
    type Error = AttributeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A tag or ingredient owned by one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: Uuid,
    pub owner: Uuid,
    pub kind: AttributeKind,
    pub name: AttributeName,
    pub created_at: DateTime<Utc>,
}

impl Attribute {
    /// Create a new attribute for the given owner.
    pub fn new(owner: Uuid, kind: AttributeKind, name: AttributeName) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            kind,
            name,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_ref())
    }
}
