//! Ingredient endpoints; same capability set as tags, delegated to the
//! shared attribute core.

use actix_web::{delete, get, patch, web, HttpResponse};

use crate::domain::AttributeKind;

use super::attributes::{self, AttributeDto, AttributeListQuery, RenameRequest};
use super::auth::CurrentUser;
use super::error::ApiResult;
use super::state::HttpState;

/// List the caller's ingredients, ordered by descending name.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(
        ("assigned_only" = Option<String>, Query, description = "If 1, only ingredients attached to at least one recipe"),
    ),
    responses(
        (status = 200, description = "Ingredients", body = [AttributeDto]),
        (status = 400, description = "Invalid query", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeDto>>> {
    attributes::list(&state, user.0.id, AttributeKind::Ingredient, &query)
        .await
        .map(web::Json)
}

/// Rename one of the caller's ingredients.
#[utoipa::path(
    patch,
    path = "/api/v1/ingredients/{id}",
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Updated ingredient", body = AttributeDto),
        (status = 400, description = "Validation failure", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error),
    ),
    tags = ["ingredients"],
    operation_id = "renameIngredient"
)]
#[patch("/ingredients/{id}")]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<uuid::Uuid>,
    payload: web::Json<RenameRequest>,
) -> ApiResult<web::Json<AttributeDto>> {
    attributes::rename(&state, user.0.id, AttributeKind::Ingredient, *id, &payload)
        .await
        .map(web::Json)
}

/// Delete one of the caller's ingredients.
#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error),
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<uuid::Uuid>,
) -> ApiResult<HttpResponse> {
    attributes::delete(&state, user.0.id, AttributeKind::Ingredient, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}
