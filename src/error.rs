//!
//! # Error Handling
//!
//! `AppError` is the single error type that crosses the HTTP boundary. Every
//! authentication and authorization failure is one of its variants, so callers
//! can pattern-match on the failure kind instead of inspecting messages.
//!
//! `AppError` implements `actix_web::error::ResponseError`, mapping each kind to
//! its status code with a `{"error": "..."}` JSON body. Server-side failures are
//! logged in full and answered with a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, Error)]
pub enum AppError {
    /// Registration (or an email change) collided with an existing account (HTTP 400).
    #[error("Email already registered")]
    EmailTaken,
    /// Unknown email, wrong password, or a refresh for a deleted account (HTTP 401).
    /// Carries no detail on purpose.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// A bearer or refresh token failed verification (HTTP 401).
    #[error("Invalid token: {0}")]
    InvalidToken(TokenError),
    /// Authentication is missing or cannot be resolved to an account (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The resource exists but the caller does not own it (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The referenced resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// A well-formed request that breaks a business rule (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Field-level input validation failed (HTTP 422).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Storage backend failure (HTTP 500).
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Anything else that went wrong on our side (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// The message placed in the response body.
    fn public_message(&self) -> String {
        match self {
            AppError::EmailTaken => "Email already registered".into(),
            AppError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.into(),
            AppError::InvalidToken(err) => err.to_string(),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Internal server error".into()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmailTaken | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken(_) | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Encoding failures are ours, not the caller's, so they are not reported as
/// an invalid token.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Encoding(msg) => {
                AppError::InternalServerError(format!("Failed to issue token: {}", msg))
            }
            other => AppError::InvalidToken(other),
        }
    }
}

/// The store's uniqueness constraint is the final arbiter for emails.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail(_) => AppError::EmailTaken,
            StoreError::Database(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
