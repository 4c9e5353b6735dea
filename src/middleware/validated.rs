// middleware/validated.rs - JSON body and query extractors that enforce field constraints
//
// Both reject with 422 and a `detail` list. `ValidJson` also remembers which keys the
// client sent, so updates only touch those fields.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{ApiError, FieldError};
use crate::models::validation::{from_serde_error, to_camel_case, validate, Validate};

pub struct ValidJson<T> {
    pub body: T,
    provided: HashSet<String>,
}

impl<T: Serialize> ValidJson<T> {
    /// The body as a document patch holding only the keys the client sent.
    pub fn patch(&self) -> Result<Map<String, Value>, ApiError> {
        match serde_json::to_value(&self.body) {
            Ok(Value::Object(mut map)) => {
                map.retain(|k, _| self.provided.contains(k));
                Ok(map)
            }
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(ApiError::internal(format!("Failed to serialize request body: {}", e))),
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            ApiError::unprocessable(vec![FieldError::new("", rejection.body_text(), "json_invalid")])
        })?;

        let provided = raw
            .as_object()
            .map(|obj| obj.keys().map(|k| to_camel_case(k)).collect())
            .unwrap_or_default();

        let body: T = serde_json::from_value(raw).map_err(|e| ApiError::unprocessable(vec![from_serde_error(&e)]))?;
        validate(&body).map_err(ApiError::unprocessable)?;

        Ok(Self { body, provided })
    }
}

/// Query string counterpart of `ValidJson`.
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state).await.map_err(|rejection| {
            ApiError::unprocessable(vec![FieldError {
                loc: vec!["query".to_string()],
                msg: rejection.body_text(),
                kind: "value_error".to_string(),
            }])
        })?;

        validate(&query).map_err(|errors| {
            ApiError::unprocessable(
                errors
                    .into_iter()
                    .map(|mut e| {
                        if let Some(first) = e.loc.first_mut() {
                            *first = "query".to_string();
                        }
                        e
                    })
                    .collect(),
            )
        })?;

        Ok(Self(query))
    }
}
