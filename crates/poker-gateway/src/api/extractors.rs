//! Axum extractors for request handling
//!
//! Bearer-token users, participants that may also be guests, and validated
//! JSON bodies.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRef, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use poker_core::Participant;
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use super::response::ApiError;
use crate::server::GatewayState;

/// Participant authenticated by a bearer JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

impl AuthUser {
    /// Room participant record for this user
    pub fn participant(&self) -> Participant {
        Participant::user(self.user_id.clone(), self.username.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    GatewayState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let state = GatewayState::from_ref(state);
        let claims = state.jwt_service().validate(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiError::from(e)
        })?;

        Ok(Self {
            user_id: claims.user_id().to_string(),
            username: claims.display_name().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GuestQuery {
    guest_id: Option<String>,
}

/// Caller identified either by bearer token or by `?guest_id=`
///
/// The bearer token wins when both are present.
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: String,
    pub is_guest: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
    GatewayState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let has_bearer = parts
            .headers
            .contains_key(axum::http::header::AUTHORIZATION);
        if has_bearer {
            let user = AuthUser::from_request_parts(parts, state).await?;
            return Ok(Self {
                id: user.user_id,
                is_guest: false,
            });
        }

        let Query(query) = Query::<GuestQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::invalid_body(e.to_string()))?;
        let guest_id = query.guest_id.ok_or(ApiError::MissingAuth)?;

        let state = GatewayState::from_ref(state);
        let guest = state
            .service_context()
            .guests()
            .get(&guest_id)
            .ok_or(ApiError::UnknownGuest)?;

        Ok(Self {
            id: guest.guest_id,
            is_guest: true,
        })
    }
}

/// Validated JSON extractor
///
/// Extracts a JSON body and validates it using the `validator` crate.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| match e {
                JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
                _ => ApiError::invalid_body("Invalid JSON body"),
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
