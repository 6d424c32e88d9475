//! Row structs bridging Diesel and the domain model.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::attribute::{Attribute, AttributeKind, AttributeName};
use crate::domain::ports::AccessToken;
use crate::domain::recipe::{Price, Recipe};
use crate::domain::user::{EmailAddress, User};

use super::schema::{access_tokens, attributes, recipe_attributes, recipes, users};

/// Conversion failures for rows that no longer satisfy domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored row violates domain invariants: {message}")]
pub struct RowConversionError {
    pub message: String,
}

impl RowConversionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
            password_hash: user.password_hash.clone(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }

    pub fn into_domain(self) -> Result<User, RowConversionError> {
        let email = EmailAddress::new(self.email)
            .map_err(|err| RowConversionError::new(format!("user email: {err}")))?;
        Ok(User {
            id: self.id,
            email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            is_active: self.is_active,
            is_staff: self.is_staff,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = access_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccessTokenRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_digest: String,
    pub created_at: DateTime<Utc>,
}

impl AccessTokenRow {
    pub fn from_domain(token: &AccessToken) -> Self {
        Self {
            id: token.id,
            user_id: token.user_id,
            token_digest: token.token_digest.clone(),
            created_at: token.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: BigDecimal,
    pub link: Option<String>,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecipeRow {
    pub fn from_domain(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            user_id: recipe.owner,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.as_decimal().clone(),
            link: recipe.link.clone(),
            image_key: recipe.image_key.clone(),
            created_at: recipe.created_at,
        }
    }

    /// Rehydrate a domain recipe; associations are attached separately.
    pub fn into_domain(self, tags: Vec<Attribute>, ingredients: Vec<Attribute>) -> Recipe {
        Recipe {
            id: self.id,
            owner: self.user_id,
            title: self.title,
            description: self.description,
            time_minutes: self.time_minutes,
            price: Price::from_decimal(self.price),
            link: self.link,
            image_key: self.image_key,
            tags,
            ingredients,
            created_at: self.created_at,
        }
    }
}

/// Changeset for scalar recipe updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub struct RecipeChangeset {
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: BigDecimal,
    pub link: Option<Option<String>>,
}

impl RecipeChangeset {
    pub fn from_domain(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.as_decimal().clone(),
            link: Some(recipe.link.clone()),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttributeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl AttributeRow {
    pub fn from_domain(attribute: &Attribute) -> Self {
        Self {
            id: attribute.id,
            user_id: attribute.owner,
            kind: attribute.kind.as_str().to_owned(),
            name: attribute.name.to_string(),
            created_at: attribute.created_at,
        }
    }

    pub fn into_domain(self) -> Result<Attribute, RowConversionError> {
        let kind = match self.kind.as_str() {
            "tag" => AttributeKind::Tag,
            "ingredient" => AttributeKind::Ingredient,
            other => {
                return Err(RowConversionError::new(format!(
                    "unknown attribute kind: {other}"
                )))
            }
        };
        let name = AttributeName::new(self.name)
            .map_err(|err| RowConversionError::new(format!("attribute name: {err}")))?;
        Ok(Attribute {
            id: self.id,
            owner: self.user_id,
            kind,
            name,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recipe_attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeAttributeRow {
    pub recipe_id: Uuid,
    pub attribute_id: Uuid,
}
