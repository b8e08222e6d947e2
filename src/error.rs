//! Error type shared by all handlers.
//!
//! Clients show either `message` or `errors[0].message`, so every failure
//! is rendered as one of those two bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::services::pricing::PricingError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Internal(detail) => {
                // Детали только в лог, клиенту - общее сообщение
                tracing::error!("Request failed: {}", detail);
                json!({ "message": "Internal server error" })
            }
            other => json!({ "message": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => ApiError::Internal(format!("database: {:?}", e)),
            other @ (StoreError::SeatTaken(_)
            | StoreError::InsufficientPoints
            | StoreError::VoucherUnavailable(_)
            | StoreError::AdminVoucherUnavailable(_)) => ApiError::Conflict(other.to_string()),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        let field = match err {
            PricingError::InvalidPrice(_) => "seats",
            PricingError::PercentOutOfRange(_) => "discount",
            PricingError::NegativePoints(_) | PricingError::PointsExceedSubtotal { .. } => "points",
        };
        ApiError::invalid(field, err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut list: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, e.code));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        list.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(list)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatPosition;

    #[test]
    fn store_conflicts_map_to_409() {
        let err: ApiError = StoreError::SeatTaken(SeatPosition { row: 2, column: 5 }).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "seat 2.5 is no longer available");
    }

    #[test]
    fn pricing_errors_point_at_a_field() {
        let err: ApiError = PricingError::PointsExceedSubtotal { points: 20_000, subtotal: 10_000.0 }.into();
        match err {
            ApiError::Validation(errors) => assert_eq!(errors[0].field, "points"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let response = ApiError::Internal("password=hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
