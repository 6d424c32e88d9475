//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP path, the wire schemas, and the bearer-token
//! security scheme. Swagger UI serves the document in debug builds and
//! `cargo run --bin openapi-dump` exports it for external tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::attributes::{AttributeDto, RenameRequest};
use crate::inbound::http::recipes::{
    CreateRecipeRequest, NameRef, PatchRecipeRequest, RecipeDetailDto, RecipeSummaryDto,
    ReplaceRecipeRequest,
};
use crate::inbound::http::users::{
    ProfileUpdateRequest, RegisterRequest, TokenRequest, TokenResponse, UserDto,
};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Larder recipe API",
        description = "Token-authenticated CRUD interface for recipes, tags, and ingredients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::issue_token,
        crate::inbound::http::users::me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_recipe_image,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::rename_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::rename_ingredient,
        crate::inbound::http::ingredients::delete_ingredient,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserDto,
        RegisterRequest,
        TokenRequest,
        TokenResponse,
        ProfileUpdateRequest,
        AttributeDto,
        RenameRequest,
        NameRef,
        RecipeSummaryDto,
        RecipeDetailDto,
        CreateRecipeRequest,
        ReplaceRecipeRequest,
        PatchRecipeRequest,
    )),
    tags(
        (name = "users", description = "Account registration, tokens, and profile"),
        (name = "recipes", description = "Recipe management"),
        (name = "tags", description = "Tag management"),
        (name = "ingredients", description = "Ingredient management"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;
