//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take a [`CurrentUser`] argument; extraction resolves the
//! `Authorization` header against stored token digests. Every failure mode
//! is the same uniform 401 so callers cannot probe which part was wrong.

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::credentials::token_digest;
use crate::domain::ports::internal_error;
use crate::domain::{Error, User};

use super::state::HttpState;

/// The authenticated caller, resolved from the bearer token.
#[derive(Clone)]
pub struct CurrentUser(pub User);

fn bearer_token(header: Option<&str>) -> Result<&str, Error> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(unauthorized)
}

fn unauthorized() -> Error {
    Error::unauthorized("authentication credentials were not provided or are invalid")
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("http state not configured"))?;
            let token = bearer_token(header.as_deref())?;
            let user = state
                .tokens
                .find_active_user(&token_digest(token))
                .await
                .map_err(|err| internal_error("resolving access token", err))?;
            user.map(CurrentUser).ok_or_else(unauthorized)
        })
    }
}
