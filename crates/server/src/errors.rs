use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Plain JSON error body: `{"error": ..., "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"error": self.error, "detail": self.detail}))).into_response()
    }
}

/// Field-level validation failures, rendered as 422.
#[derive(Debug)]
pub struct ValidationFailed(pub ValidationErrors);

impl ValidationFailed {
    pub const MESSAGE: &'static str = "The given data was invalid.";

    /// Flatten nested struct and list errors into `parent.child` keys.
    pub fn field_messages(&self) -> BTreeMap<String, Vec<String>> {
        let mut out = BTreeMap::new();
        collect_messages(&self.0, None, &mut out);
        out
    }
}

fn collect_messages(errors: &ValidationErrors, prefix: Option<&str>, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let fallback = format!("The {} is invalid.", key.replace('_', " "));
                let messages = out.entry(key).or_insert_with(Vec::new);
                for e in errs {
                    messages.push(e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| fallback.clone()));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, Some(&key), out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect_messages(inner, Some(&format!("{}.{}", key, idx)), out);
                }
            }
        }
    }
}

impl IntoResponse for ValidationFailed {
    fn into_response(self) -> Response {
        let body = json!({"message": Self::MESSAGE, "errors": self.field_messages()});
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

/// Build a validation error carrying a ready-made message.
pub fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message.into()));
    err
}

/// Error type returned by every handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(ValidationFailed),
    #[error("{}", .0.error)]
    Api(JsonApiError),
}

impl From<ValidationFailed> for AppError {
    fn from(v: ValidationFailed) -> Self { Self::Validation(v) }
}

impl From<JsonApiError> for AppError {
    fn from(e: JsonApiError) -> Self { Self::Api(e) }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                Self::Api(JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(msg)))
            }
            ServiceError::NotFound(msg) => Self::Api(JsonApiError::not_found(msg)),
            other => {
                error!(error = %other, "request failed");
                Self::Api(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(v) => v.into_response(),
            Self::Api(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_failed_renders_422_with_field_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("lng", field_error("required_with", "The lng field is required when lat is present."));
        errors.add("distance", field_error("required_with", "The distance field is required when lat is present."));
        let resp = ValidationFailed(errors).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["lng"][0], "The lng field is required when lat is present.");
        assert_eq!(body["errors"]["distance"][0], "The distance field is required when lat is present.");
    }

    #[tokio::test]
    async fn service_errors_map_to_statuses() {
        let nf: AppError = ServiceError::not_found("service").into();
        assert_eq!(nf.into_response().status(), StatusCode::NOT_FOUND);

        let invalid: AppError = ServiceError::Model(ModelError::Validation("bad".into())).into();
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let db: AppError = ServiceError::Db("connection reset".into()).into();
        let resp = db.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["detail"].is_null());
    }
}
