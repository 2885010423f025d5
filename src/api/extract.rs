use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::domain::model::Tenant;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde_json::Value;

pub const API_KEY_HEADER: &str = "x-api-key";

const MISSING_API_KEY: &str = "Missing API key";
const INVALID_API_KEY: &str = "Invalid API key";

/// The tenant resolved from the `x-api-key` header.
///
/// Header names are case-insensitive in `HeaderMap`, so `X-API-Key` and
/// friends all land here. The value is trimmed before lookup.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Tenant);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::Unauthorized(MISSING_API_KEY))?;

        state
            .registry
            .find_by_api_key(api_key)
            .map(Authenticated)
            .ok_or(ApiError::Unauthorized(INVALID_API_KEY))
    }
}

/// Raw JSON body. Field-level checks happen in the validator so callers get
/// field-specific messages instead of a generic deserialization error.
/// An empty body reads as an empty object.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::bad_request("Invalid request body"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Default::default())));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| ApiError::bad_request("Invalid JSON body"))
    }
}
