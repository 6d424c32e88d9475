//! HTTP server wiring: route registration and state construction.

pub mod config;

use std::sync::Arc;

use actix_web::web;

use crate::inbound::http::state::HttpState;
use crate::inbound::http::{health, ingredients, recipes, tags, users};
use crate::outbound::persistence::{
    DbPool, DieselAccessTokenRepository, DieselAttributeRepository, DieselRecipeRepository,
    DieselUserRepository,
};
use crate::outbound::storage::FsImageStore;

pub use config::{AppConfig, ConfigError};

/// Build handler state backed by the Diesel repositories and the filesystem
/// image store.
pub fn build_state(pool: &DbPool, config: &AppConfig) -> HttpState {
    HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAccessTokenRepository::new(pool.clone())),
        Arc::new(DieselRecipeRepository::new(pool.clone())),
        Arc::new(DieselAttributeRepository::new(pool.clone())),
        Arc::new(FsImageStore::new(config.media_root.clone())),
    )
}

/// Register the versioned API surface on an Actix app.
///
/// The caller supplies [`HttpState`] via `app_data` beforehand; tests reuse
/// this function with in-memory ports.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(users::register)
            .service(users::issue_token)
            .service(users::me)
            .service(users::update_me)
            .service(recipes::list_recipes)
            .service(recipes::create_recipe)
            .service(recipes::get_recipe)
            .service(recipes::replace_recipe)
            .service(recipes::patch_recipe)
            .service(recipes::delete_recipe)
            .service(recipes::upload_recipe_image)
            .service(tags::list_tags)
            .service(tags::rename_tag)
            .service(tags::delete_tag)
            .service(ingredients::list_ingredients)
            .service(ingredients::rename_ingredient)
            .service(ingredients::delete_ingredient),
    );
}

/// Register the unversioned health probes.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}
