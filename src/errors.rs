use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde::Serialize;
use validator::ValidationErrors;

use crate::constants::{
    ERR_INVALID_PAYLOAD, ERR_MISCONFIGURED, ERR_RATE_LIMITED, ERR_UNEXPECTED,
};
use crate::entities::booking::ResponseEnvelope;

/// Failure taxonomy for the booking pipeline. Internal detail is kept for
/// logging; the wire response is always one of the fixed envelope messages.
#[derive(Debug)]
pub enum BookingError {
    Validation(Vec<FieldError>),
    RateLimited,
    Misconfigured,
    Dispatch(String),
    Internal(String),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::Validation(errors) => {
                let messages = errors
                    .iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            BookingError::RateLimited => write!(f, "rate limit exceeded"),
            BookingError::Misconfigured => write!(f, "email sending is not configured"),
            BookingError::Dispatch(msg) => write!(f, "email dispatch failed: {}", msg),
            BookingError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl BookingError {
    /// The fixed message the client is allowed to see.
    fn client_message(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => ERR_INVALID_PAYLOAD,
            BookingError::RateLimited => ERR_RATE_LIMITED,
            BookingError::Misconfigured => ERR_MISCONFIGURED,
            BookingError::Dispatch(_) | BookingError::Internal(_) => ERR_UNEXPECTED,
        }
    }
}

impl ResponseError for BookingError {
    fn error_response(&self) -> HttpResponse {
        match self {
            BookingError::Validation(_) => tracing::debug!("rejected booking request: {}", self),
            BookingError::RateLimited => tracing::info!("rejected booking request: {}", self),
            _ => tracing::error!("booking request failed: {}", self),
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(ResponseEnvelope::err(self.client_message()))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BookingError::Misconfigured
            | BookingError::Dispatch(_)
            | BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for BookingError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        BookingError::Validation(field_errors)
    }
}

impl From<anyhow::Error> for BookingError {
    fn from(err: anyhow::Error) -> Self {
        BookingError::Internal(err.to_string())
    }
}

impl From<redis::RedisError> for BookingError {
    fn from(err: redis::RedisError) -> Self {
        BookingError::Internal(format!("redis error: {}", err))
    }
}

impl From<deadpool_redis::PoolError> for BookingError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        BookingError::Internal(format!("redis pool error: {}", err))
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        BookingError::Dispatch(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
