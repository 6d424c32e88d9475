//! Diesel-backed persistence adapters for the domain ports.

mod diesel_attribute_repository;
mod diesel_recipe_repository;
mod diesel_token_repository;
mod diesel_user_repository;
mod error_map;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_attribute_repository::DieselAttributeRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_token_repository::DieselAccessTokenRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{run_migrations, DbPool, PoolConfig, PoolError};
