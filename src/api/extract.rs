use axum::{
    async_trait,
    extract::{rejection::JsonRejection, rejection::QueryRejection, FromRequest, FromRequestParts, Query, Request},
    http::{header::USER_AGENT, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;

/// `User-Agent` header of the request, if present and valid UTF-8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientUserAgent(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientUserAgent
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientUserAgent(extract_header_value(&parts.headers, USER_AGENT.as_str())))
    }
}

/// Extract header value as string; non-ASCII bytes are decoded as UTF-8,
/// so only a missing header yields `None`
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// JSON body whose decoding failures become 422 `{"detail"}` responses
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ValidJson(value))
    }
}

/// Query string whose decoding failures become 422 `{"detail"}` responses
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::Validation(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}
