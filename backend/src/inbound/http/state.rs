//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenRepository, AttributeRepository, ImageStore, RecipeRepository, UserRepository,
};
use crate::domain::RecipeService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn AccessTokenRepository>,
    pub attributes: Arc<dyn AttributeRepository>,
    pub recipes: RecipeService,
}

impl HttpState {
    /// Assemble handler state from the port implementations.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn AccessTokenRepository>,
        recipes: Arc<dyn RecipeRepository>,
        attributes: Arc<dyn AttributeRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            users,
            tokens,
            attributes: attributes.clone(),
            recipes: RecipeService::new(recipes, attributes, images),
        }
    }
}
