use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::StoreError;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldViolation]>,
}

impl AppError {
    fn public_message(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation failed",
            AppError::BadRequest(msg) | AppError::Conflict(msg) | AppError::NotFound(msg) => msg,
            AppError::InvalidCredentials => INVALID_CREDENTIALS,
            AppError::Internal(_) => "Internal server error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Conflicts and bad credentials share 400 with validation failures.
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            AppError::Validation(violations) => Some(violations.as_slice()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: self.public_message(),
            errors,
        })
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::Backend(err) => {
                error!("Database error: {:?}", err);
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        error!("Blocking task failed: {}", err);
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::Value;
    use validator::ValidationError;

    async fn body_of(err: AppError) -> (StatusCode, Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_of(AppError::Internal("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("errors").is_none());
    }

    #[actix_web::test]
    async fn conflict_maps_to_bad_request() {
        let (status, body) = body_of(AppError::Conflict("Email already exists.".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already exists.");
    }

    #[actix_web::test]
    async fn validation_errors_are_sorted_and_listed() {
        let mut errs = ValidationErrors::new();
        let mut password = ValidationError::new("length");
        password.message = Some("Password must be at least 6 characters".into());
        errs.add("password", password);
        errs.add("email", ValidationError::new("email"));

        let (status, body) = body_of(AppError::from(errs)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "email");
        assert_eq!(errors[0]["message"], "Invalid value (email)");
        assert_eq!(errors[1]["field"], "password");
    }
}
