//! Domain model: entities, validation, ports, and use-cases.

pub mod attribute;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod user;

pub use attribute::{Attribute, AttributeKind, AttributeName, AttributeValidationError};
pub use error::{Error, ErrorCode};
pub use recipe::{Price, Recipe, RecipeDraft, RecipeUpdate, RecipeValidationError};
pub use recipe_service::RecipeService;
pub use user::{EmailAddress, User, UserValidationError};
