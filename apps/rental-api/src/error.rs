//! Error types for the Rental API.
//!
//! Every handler returns [`ApiResult`]. Lower layers convert into [`ApiError`]
//! with `?`:
//!
//! ```text
//! CoreError ──┐
//! DbError   ──┼──► ApiError ──► { "success": false, "message": ..., ...details }
//! JsonRejection ┘
//! ```
//!
//! Internal failures are logged here and answered with a generic message.
//! The underlying cause is attached to the response as an [`InternalDetail`]
//! extension; [`expose_internal_errors`] copies it into the body as `error`
//! when running in development.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use rental_core::{CoreError, ValidationError};
use rental_db::DbError;

use crate::AppState;

/// Message sent to clients for anything that is our fault.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    /// Extra top-level fields (`invalidItems`, `missingProducts`, ...).
    details: Map<String, Value>,
    /// Cause of a 500, never sent outside development.
    internal: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
            details: Map::new(),
            internal: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// A 500 whose cause is logged and kept out of the public message.
    pub fn internal(cause: impl ToString) -> Self {
        ApiError {
            internal: Some(cause.to_string()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
        }
    }

    /// Adds a top-level field to the error body.
    pub fn with_detail(mut self, field: &str, value: impl serde::Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.details.insert(field.to_string(), value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

/// Maps business errors to status codes.
///
/// ```text
/// InvalidItems, ItemsUnavailable, InvalidStatusTransition, Validation → 400
/// Unauthenticated                                                    → 401
/// Forbidden                                                          → 403
/// ItemsNotFound, OrderNotFound, ReviewNotFound, UserNotFound         → 404
/// MalformedOrderId                                                   → 500
/// ```
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidItems(lines) => {
                ApiError::bad_request("Invalid items in order").with_detail("invalidItems", lines)
            }

            CoreError::ItemsNotFound { keys } => {
                let message = match keys.as_slice() {
                    [key] => format!("Product with key {} not found", key),
                    _ => "Some vehicles not found".to_string(),
                };
                ApiError::not_found(message).with_detail("missingProducts", keys)
            }

            CoreError::ItemsUnavailable { items } => {
                let message = match items.as_slice() {
                    [item] => format!("Product with key {} is not available", item.key),
                    _ => "Some vehicles are not available".to_string(),
                };
                ApiError::bad_request(message).with_detail("unavailableProducts", items)
            }

            CoreError::OrderNotFound(_) => ApiError::not_found("Order not found"),
            CoreError::ReviewNotFound(_) => ApiError::not_found("Review not found"),
            CoreError::UserNotFound(_) => ApiError::not_found("User not found"),

            CoreError::InvalidStatusTransition { .. } => ApiError::bad_request(err.to_string()),

            CoreError::Unauthenticated => ApiError::unauthorized(err.to_string()),

            CoreError::Forbidden { .. } => {
                ApiError::forbidden("You are not authorized to perform this action")
            }

            CoreError::Validation(inner) => ApiError::from(inner),

            CoreError::MalformedOrderId(_) => ApiError::internal(err),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Storage errors are internal except for lookups and uniqueness.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::not_found(format!("{} not found", entity)),
            DbError::UniqueViolation { field, value } => {
                ApiError::bad_request(format!("A record with {} '{}' already exists", field, value))
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

// =============================================================================
// Response
// =============================================================================

/// Cause of an internal error, carried on the response for
/// [`expose_internal_errors`].
#[derive(Debug, Clone)]
pub struct InternalDetail {
    body: Value,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("message".to_string(), Value::String(self.message));
        body.extend(self.details);
        let body = Value::Object(body);

        match self.internal {
            Some(detail) => {
                error!(status = %self.status, error = %detail, "Request failed");
                let mut response = (self.status, Json(body.clone())).into_response();
                response
                    .extensions_mut()
                    .insert(InternalDetail { body, detail });
                response
            }
            None => {
                warn!(status = %self.status, message = %body["message"], "Request rejected");
                (self.status, Json(body)).into_response()
            }
        }
    }
}

/// Response middleware: in development, re-renders internal errors with an
/// `error` field holding the cause.
pub async fn expose_internal_errors(State(state): State<AppState>, response: Response) -> Response {
    if !state.config.is_development() {
        return response;
    }

    let Some(InternalDetail { mut body, detail }) =
        response.extensions().get::<InternalDetail>().cloned()
    else {
        return response;
    };

    body["error"] = Value::String(detail);
    (response.status(), Json(body)).into_response()
}

/// `{ "success": true, "message": ... }` merged with `payload`'s fields.
pub fn success(message: &str, payload: Value) -> Value {
    let mut body = json!({ "success": true, "message": message });
    if let (Value::Object(target), Value::Object(fields)) = (&mut body, payload) {
        target.extend(fields);
    }
    body
}
