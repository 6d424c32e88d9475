//! Recipe endpoints.

use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::RecipeFilter;
use crate::domain::{
    AttributeName, Error, Price, Recipe, RecipeDraft, RecipeUpdate, RecipeValidationError,
};

use super::attributes::AttributeDto;
use super::auth::CurrentUser;
use super::error::ApiResult;
use super::filters::parse_id_list;
use super::state::HttpState;

/// Embedded name reference used for tags and ingredients in recipe payloads.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NameRef {
    #[schema(example = "Indian")]
    pub name: String,
}

/// Summary representation returned by the list endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummaryDto {
    pub id: Uuid,
    #[schema(example = "Thai Prawn Curry")]
    pub title: String,
    pub time_minutes: i32,
    #[schema(example = "2.50")]
    pub price: String,
    pub link: Option<String>,
    pub tags: Vec<AttributeDto>,
    pub ingredients: Vec<AttributeDto>,
}

/// Detail representation with description and image key.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailDto {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    #[schema(example = "2.50")]
    pub price: String,
    pub link: Option<String>,
    pub description: String,
    pub image: Option<String>,
    pub tags: Vec<AttributeDto>,
    pub ingredients: Vec<AttributeDto>,
}

fn attribute_dtos(attributes: &[crate::domain::Attribute]) -> Vec<AttributeDto> {
    attributes.iter().map(AttributeDto::from_domain).collect()
}

impl RecipeSummaryDto {
    fn from_domain(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.to_string(),
            link: recipe.link.clone(),
            tags: attribute_dtos(&recipe.tags),
            ingredients: attribute_dtos(&recipe.ingredients),
        }
    }
}

impl RecipeDetailDto {
    fn from_domain(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price.to_string(),
            link: recipe.link.clone(),
            description: recipe.description.clone(),
            image: recipe.image_key.clone(),
            tags: attribute_dtos(&recipe.tags),
            ingredients: attribute_dtos(&recipe.ingredients),
        }
    }
}

/// Creation payload for `POST /api/v1/recipes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub time_minutes: i32,
    #[schema(example = "2.50")]
    pub price: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<NameRef>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NameRef>>,
}

/// Full-update payload for `PUT /api/v1/recipes/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRecipeRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub time_minutes: i32,
    pub price: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<NameRef>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NameRef>>,
}

/// Partial-update payload for `PATCH /api/v1/recipes/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchRecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time_minutes: Option<i32>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<NameRef>>,
    #[serde(default)]
    pub ingredients: Option<Vec<NameRef>>,
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

fn parse_price(raw: &str) -> Result<Price, Error> {
    Price::parse(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "price" }))
    })
}

fn parse_names(refs: Vec<NameRef>, field: &'static str) -> Result<Vec<AttributeName>, Error> {
    refs.into_iter()
        .enumerate()
        .map(|(index, name_ref)| {
            AttributeName::new(name_ref.name).map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": field, "index": index }))
            })
        })
        .collect()
}

fn map_validation(err: RecipeValidationError) -> Error {
    Error::invalid_request(err.to_string())
}

fn parse_filter(query: &ListRecipesQuery) -> Result<RecipeFilter, Error> {
    Ok(RecipeFilter {
        tag_ids: query
            .tags
            .as_deref()
            .map(|raw| parse_id_list(raw, "tags"))
            .transpose()?,
        ingredient_ids: query
            .ingredients
            .as_deref()
            .map(|raw| parse_id_list(raw, "ingredients"))
            .transpose()?,
    })
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("tags" = Option<String>, Query, description = "Comma-separated tag ids to filter by"),
        ("ingredients" = Option<String>, Query, description = "Comma-separated ingredient ids to filter by"),
    ),
    responses(
        (status = 200, description = "Recipes", body = [RecipeSummaryDto]),
        (status = 400, description = "Invalid query", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<ListRecipesQuery>,
) -> ApiResult<web::Json<Vec<RecipeSummaryDto>>> {
    let filter = parse_filter(&query)?;
    let recipes = state.recipes.list(user.0.id, &filter).await?;
    Ok(web::Json(
        recipes.iter().map(RecipeSummaryDto::from_domain).collect(),
    ))
}

/// Create a recipe, reconciling embedded tag and ingredient names.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDetailDto),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = RecipeDraft::new(
        payload.title,
        payload.description.unwrap_or_default(),
        payload.time_minutes,
        parse_price(&payload.price)?,
        payload.link,
        parse_names(payload.tags.unwrap_or_default(), "tags")?,
        parse_names(payload.ingredients.unwrap_or_default(), "ingredients")?,
    )
    .map_err(map_validation)?;

    let recipe = state.recipes.create(user.0.id, draft).await?;
    Ok(HttpResponse::Created().json(RecipeDetailDto::from_domain(&recipe)))
}

/// Fetch one of the caller's recipes.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailDto),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let recipe = state.recipes.get(user.0.id, *id).await?;
    Ok(web::Json(RecipeDetailDto::from_domain(&recipe)))
}

/// Replace one of the caller's recipes.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    request_body = ReplaceRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    payload: web::Json<ReplaceRecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let payload = payload.into_inner();
    let update = RecipeUpdate {
        title: Some(payload.title),
        description: Some(payload.description.unwrap_or_default()),
        time_minutes: Some(payload.time_minutes),
        price: Some(parse_price(&payload.price)?),
        link: Some(payload.link),
        tags: payload
            .tags
            .map(|refs| parse_names(refs, "tags"))
            .transpose()?,
        ingredients: payload
            .ingredients
            .map(|refs| parse_names(refs, "ingredients"))
            .transpose()?,
    };

    let recipe = state.recipes.update(user.0.id, *id, update).await?;
    Ok(web::Json(RecipeDetailDto::from_domain(&recipe)))
}

/// Partially update one of the caller's recipes.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    request_body = PatchRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    payload: web::Json<PatchRecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let payload = payload.into_inner();
    let update = RecipeUpdate {
        title: payload.title,
        description: payload.description,
        time_minutes: payload.time_minutes,
        price: payload.price.as_deref().map(parse_price).transpose()?,
        link: payload.link.map(Some),
        tags: payload
            .tags
            .map(|refs| parse_names(refs, "tags"))
            .transpose()?,
        ingredients: payload
            .ingredients
            .map(|refs| parse_names(refs, "ingredients"))
            .transpose()?,
    };

    let recipe = state.recipes.update(user.0.id, *id, update).await?;
    Ok(web::Json(RecipeDetailDto::from_domain(&recipe)))
}

/// Delete one of the caller's recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.recipes.delete(user.0.id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Upload or replace the recipe's image.
///
/// The request body is the raw image; the `Content-Type` header selects the
/// stored extension.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/image",
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailDto),
        (status = 400, description = "Unsupported image", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipes/{id}/image")]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeDetailDto>> {
    let content_type = request
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();

    let recipe = state
        .recipes
        .attach_image(user.0.id, *id, &content_type, &body)
        .await?;
    Ok(web::Json(RecipeDetailDto::from_domain(&recipe)))
}
