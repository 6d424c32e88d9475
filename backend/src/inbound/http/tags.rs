//! Tag endpoints.
//!
//! Tags have no direct create endpoint; records come into being through
//! recipe reconciliation only.

use actix_web::{delete, get, patch, web, HttpResponse};

use crate::domain::AttributeKind;

use super::attributes::{self, AttributeDto, AttributeListQuery, RenameRequest};
use super::auth::CurrentUser;
use super::error::ApiResult;
use super::state::HttpState;

/// List the caller's tags, ordered by descending name.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    params(
        ("assigned_only" = Option<String>, Query, description = "If 1, only tags attached to at least one recipe"),
    ),
    responses(
        (status = 200, description = "Tags", body = [AttributeDto]),
        (status = 400, description = "Invalid query", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeDto>>> {
    attributes::list(&state, user.0.id, AttributeKind::Tag, &query)
        .await
        .map(web::Json)
}

/// Rename one of the caller's tags.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Updated tag", body = AttributeDto),
        (status = 400, description = "Validation failure", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error),
    ),
    tags = ["tags"],
    operation_id = "renameTag"
)]
#[patch("/tags/{id}")]
pub async fn rename_tag(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<uuid::Uuid>,
    payload: web::Json<RenameRequest>,
) -> ApiResult<web::Json<AttributeDto>> {
    attributes::rename(&state, user.0.id, AttributeKind::Tag, *id, &payload)
        .await
        .map(web::Json)
}

/// Delete one of the caller's tags.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error),
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<uuid::Uuid>,
) -> ApiResult<HttpResponse> {
    attributes::delete(&state, user.0.id, AttributeKind::Tag, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}
