//! User account endpoints: registration, token issuance, and profile.

use actix_web::{get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::credentials::{generate_token, hash_password, token_digest, verify_password};
use crate::domain::ports::{internal_error, AccessToken, ProfileChanges, UserPersistenceError};
use crate::domain::{EmailAddress, Error, User};

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::state::HttpState;

/// Registration payload for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    #[serde(default)]
    #[schema(example = "Ada Lovelace")]
    pub display_name: Option<String>,
}

/// Credentials payload for `POST /api/v1/users/token`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Profile update payload for `PATCH /api/v1/users/me`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Public view of a user account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: uuid::Uuid,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub display_name: String,
}

impl UserDto {
    fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
        }
    }
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "email" }))
    })
}

fn hash_new_password(raw: &str) -> Result<String, Error> {
    hash_password(raw).map_err(|err| err.with_details(json!({ "field": "password" })))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Validation failure", body = Error),
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = parse_email(&payload.email)?;
    let password_hash = hash_new_password(&payload.password)?;
    let user = User::new(email, payload.display_name.unwrap_or_default(), password_hash);

    match state.users.insert(&user).await {
        Ok(()) => {
            info!(user = %user.id, "account registered");
            Ok(HttpResponse::Created().json(UserDto::from_domain(&user)))
        }
        Err(UserPersistenceError::DuplicateEmail) => Err(Error::invalid_request(
            "a user with this email already exists",
        )
        .with_details(json!({ "field": "email" }))),
        Err(err) => Err(internal_error("registering user", err)),
    }
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/users/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Bad credentials", body = Error),
    ),
    tags = ["users"],
    operation_id = "issueToken",
    security([])
)]
#[post("/users/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let payload = payload.into_inner();
    let bad_credentials =
        || Error::invalid_request("unable to authenticate with provided credentials");

    let email = parse_email(&payload.email).map_err(|_| bad_credentials())?;
    let user = state
        .users
        .find_by_email(&email)
        .await
        .map_err(|err| internal_error("looking up user", err))?
        .filter(|user| user.is_active)
        .ok_or_else(bad_credentials)?;

    if !verify_password(&user.password_hash, &payload.password)? {
        return Err(bad_credentials());
    }

    let token = generate_token();
    state
        .tokens
        .insert(&AccessToken::new(user.id, token_digest(&token)))
        .await
        .map_err(|err| internal_error("storing access token", err))?;

    info!(user = %user.id, "token issued");
    Ok(web::Json(TokenResponse { token }))
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserDto),
        (status = 401, description = "Unauthorised", body = Error),
    ),
    tags = ["users"],
    operation_id = "me"
)]
#[get("/users/me")]
pub async fn me(user: CurrentUser) -> ApiResult<web::Json<UserDto>> {
    Ok(web::Json(UserDto::from_domain(&user.0)))
}

/// Update the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
    ),
    tags = ["users"],
    operation_id = "updateMe"
)]
#[patch("/users/me")]
pub async fn update_me(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserDto>> {
    let payload = payload.into_inner();
    let password_hash = payload
        .password
        .as_deref()
        .map(hash_new_password)
        .transpose()?;

    let updated = state
        .users
        .update_profile(
            user.0.id,
            ProfileChanges {
                display_name: payload.display_name,
                password_hash,
            },
        )
        .await
        .map_err(|err| internal_error("updating profile", err))?
        .ok_or_else(|| Error::not_found("user not found"))?;

    Ok(web::Json(UserDto::from_domain(&updated)))
}
