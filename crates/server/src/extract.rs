//! Request extractors.
//!
//! `ValidatedJson<T>` works like `axum::Json<T>` but also runs
//! `validator::Validate::validate()` on the body. Malformed JSON is a 400,
//! a body that parses but breaks a rule is a 422 with per-field messages.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, JsonApiError, ValidationFailed};

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid JSON", Some(rejection.body_text())))?;
        value.validate().map_err(ValidationFailed)?;
        Ok(ValidatedJson(value))
    }
}
