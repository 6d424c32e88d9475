//! Shared handler core for the tag and ingredient endpoints.
//!
//! Both resources expose the same capability set {list, rename, delete};
//! the route modules delegate here with their [`AttributeKind`] rather than
//! duplicating the logic.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::internal_error;
use crate::domain::{Attribute, AttributeKind, AttributeName, Error};

use super::error::ApiResult;
use super::filters::parse_assigned_only;
use super::state::HttpState;

/// Wire representation of a tag or ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDto {
    pub id: Uuid,
    #[schema(example = "Vegan")]
    pub name: String,
}

impl AttributeDto {
    pub(crate) fn from_domain(attribute: &Attribute) -> Self {
        Self {
            id: attribute.id,
            name: attribute.name.to_string(),
        }
    }
}

/// Rename payload shared by both resources.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RenameRequest {
    #[schema(example = "Dessert")]
    pub name: String,
}

/// Query parameters accepted by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AttributeListQuery {
    pub assigned_only: Option<String>,
}

pub(crate) fn parse_name(raw: &str, kind: AttributeKind) -> Result<AttributeName, Error> {
    AttributeName::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "name", "resource": kind.as_str() }))
    })
}

fn not_found(kind: AttributeKind) -> Error {
    Error::not_found(format!("{} not found", kind.as_str()))
}

pub(crate) async fn list(
    state: &HttpState,
    owner: Uuid,
    kind: AttributeKind,
    query: &AttributeListQuery,
) -> ApiResult<Vec<AttributeDto>> {
    let assigned_only = parse_assigned_only(query.assigned_only.as_deref())?;
    let attributes = state
        .attributes
        .list_for_owner(owner, kind, assigned_only)
        .await
        .map_err(|err| internal_error("listing attributes", err))?;
    Ok(attributes.iter().map(AttributeDto::from_domain).collect())
}

pub(crate) async fn rename(
    state: &HttpState,
    owner: Uuid,
    kind: AttributeKind,
    id: Uuid,
    request: &RenameRequest,
) -> ApiResult<AttributeDto> {
    let name = parse_name(&request.name, kind)?;
    let attribute = state
        .attributes
        .rename_for_owner(owner, kind, id, name)
        .await
        .map_err(|err| internal_error("renaming attribute", err))?
        .ok_or_else(|| not_found(kind))?;
    Ok(AttributeDto::from_domain(&attribute))
}

pub(crate) async fn delete(
    state: &HttpState,
    owner: Uuid,
    kind: AttributeKind,
    id: Uuid,
) -> ApiResult<()> {
    let deleted = state
        .attributes
        .delete_for_owner(owner, kind, id)
        .await
        .map_err(|err| internal_error("deleting attribute", err))?;
    if deleted {
        Ok(())
    } else {
        Err(not_found(kind))
    }
}
