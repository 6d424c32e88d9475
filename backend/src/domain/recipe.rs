//! Recipe model and write payloads.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attribute::{Attribute, AttributeName};

/// Validation errors raised when constructing recipe values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    NonPositiveMinutes,
    MalformedPrice,
    NegativePrice,
    PriceTooPrecise { scale: u8 },
    PriceTooLarge { max: u32 },
    LinkTooLong { max: usize },
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::NonPositiveMinutes => write!(f, "time_minutes must be positive"),
            Self::MalformedPrice => write!(f, "price must be a decimal number"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::PriceTooPrecise { scale } => {
                write!(f, "price must have at most {scale} decimal places")
            }
            Self::PriceTooLarge { max } => write!(f, "price must be below {max}"),
            Self::LinkTooLong { max } => write!(f, "link must be at most {max} characters"),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

/// Maximum stored length for a recipe title or link.
pub const TITLE_MAX: usize = 255;
/// Maximum stored length for a recipe link.
pub const LINK_MAX: usize = 255;
/// Fractional digits permitted on a price.
pub const PRICE_SCALE: u8 = 2;
/// Exclusive upper bound on a price, matching the NUMERIC(5, 2) column.
pub const PRICE_MAX: u32 = 1000;

/// Non-negative decimal price with at most two fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Price(BigDecimal);

impl Price {
    /// Parse and validate a decimal string such as `"2.50"`.
    pub fn parse(raw: &str) -> Result<Self, RecipeValidationError> {
        let value =
            BigDecimal::from_str(raw.trim()).map_err(|_| RecipeValidationError::MalformedPrice)?;
        if value < BigDecimal::zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        let (_, scale) = value.normalized().as_bigint_and_exponent();
        if scale > i64::from(PRICE_SCALE) {
            return Err(RecipeValidationError::PriceTooPrecise { scale: PRICE_SCALE });
        }
        if value >= BigDecimal::from(PRICE_MAX) {
            return Err(RecipeValidationError::PriceTooLarge { max: PRICE_MAX });
        }
        Ok(Self(value.with_scale(i64::from(PRICE_SCALE))))
    }

    /// Wrap a decimal loaded from storage, re-applying the canonical scale.
    pub fn from_decimal(value: BigDecimal) -> Self {
        Self(value.with_scale(i64::from(PRICE_SCALE)))
    }

    /// Access the underlying decimal value.
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Price> for String {
    fn from(value: Price) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Price {
    type Error = RecipeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// A recipe owned by one user, with its attached tags and ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Price,
    pub link: Option<String>,
    pub image_key: Option<String>,
    pub tags: Vec<Attribute>,
    pub ingredients: Vec<Attribute>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Validated payload for creating a recipe.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub time_minutes: i32,
    pub price: Price,
    pub link: Option<String>,
    pub tags: Vec<AttributeName>,
    pub ingredients: Vec<AttributeName>,
}

impl RecipeDraft {
    /// Validate scalar fields and assemble a draft.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        time_minutes: i32,
        price: Price,
        link: Option<String>,
        tags: Vec<AttributeName>,
        ingredients: Vec<AttributeName>,
    ) -> Result<Self, RecipeValidationError> {
        let title = title.into();
        validate_title(&title)?;
        validate_minutes(time_minutes)?;
        if let Some(link) = &link {
            validate_link(link)?;
        }
        Ok(Self {
            title,
            description: description.into(),
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        })
    }

    /// Materialise the draft into a [`Recipe`] for the given owner.
    ///
    /// Tag and ingredient associations are reconciled separately; the new
    /// recipe starts with empty sets.
    pub fn into_recipe(self, owner: Uuid) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            owner,
            title: self.title,
            description: self.description,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            image_key: None,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a recipe. `None` fields are left untouched; for the
/// attribute lists an explicit empty vector clears the associations.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Price>,
    pub link: Option<Option<String>>,
    pub tags: Option<Vec<AttributeName>>,
    pub ingredients: Option<Vec<AttributeName>>,
}

impl RecipeUpdate {
    /// Validate the populated scalar fields.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(minutes) = self.time_minutes {
            validate_minutes(minutes)?;
        }
        if let Some(Some(link)) = &self.link {
            validate_link(link)?;
        }
        Ok(())
    }

    /// Apply the populated scalar fields to a recipe. Associations are
    /// reconciled by the service, not here.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            recipe.description.clone_from(description);
        }
        if let Some(minutes) = self.time_minutes {
            recipe.time_minutes = minutes;
        }
        if let Some(price) = &self.price {
            recipe.price = price.clone();
        }
        if let Some(link) = &self.link {
            recipe.link.clone_from(link);
        }
    }
}

fn validate_title(title: &str) -> Result<(), RecipeValidationError> {
    if title.trim().is_empty() {
        return Err(RecipeValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(RecipeValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(())
}

fn validate_minutes(minutes: i32) -> Result<(), RecipeValidationError> {
    if minutes <= 0 {
        return Err(RecipeValidationError::NonPositiveMinutes);
    }
    Ok(())
}

fn validate_link(link: &str) -> Result<(), RecipeValidationError> {
    if link.chars().count() > LINK_MAX {
        return Err(RecipeValidationError::LinkTooLong { max: LINK_MAX });
    }
    Ok(())
}
