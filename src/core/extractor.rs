//! Request extractors that fail in the API's error shape.
//!
//! Axum's stock `Json` and `Query` reject with plain-text bodies; every error
//! this API returns is `{ "error": ..., "details"? }`, so handlers take these
//! wrappers instead.

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// JSON body extractor for the save endpoints.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(dto)) => Ok(Self(dto)),
            Err(rejection) => Err(body_error(rejection)),
        }
    }
}

fn body_error(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonSyntaxError(err) => {
            format!("Request body is not valid JSON: {}", err)
        }
        JsonRejection::JsonDataError(err) => {
            format!("Request body does not match the expected fields: {}", err)
        }
        JsonRejection::MissingJsonContentType(_) => {
            "Request must be sent as application/json".to_string()
        }
        other => format!("Could not read request body: {}", other),
    };
    AppError::BadRequest(message)
}

/// Query-string extractor for the list filters, so a bad `sortBy` value or a
/// malformed date lands in the same error shape as everything else.
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(Self(params)),
            Err(QueryRejection::FailedToDeserializeQueryString(err)) => Err(
                AppError::BadRequest(format!("Invalid query parameter: {}", err)),
            ),
            Err(other) => Err(AppError::BadRequest(format!(
                "Could not read query string: {}",
                other
            ))),
        }
    }
}
