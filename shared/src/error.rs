use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Workspace-wide error taxonomy. Every store-access and engine
/// function fails fast with one of these; the HTTP layer translates
/// the kind into a status code and a `{success, message}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed interval, inactive/deleted office, and other
    /// requests that are well-formed JSON but semantically unusable.
    #[error("{0}")]
    UnprocessableEntity(String),
    /// The requested interval lies outside every availability window.
    #[error("{0}")]
    SlotUnavailable(String),
    /// Status change not in the booking state-machine table.
    #[error("{0}")]
    InvalidStatusTransition(String),
    #[error("{0}")]
    EntityNotFound(String),
    /// Overlapping availability window or overlapping active booking.
    #[error("{0}")]
    ResourceConflict(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("authentication is required")]
    Unauthenticated,
    #[error("{0}")]
    Forbidden(String),
    #[error("failed to convert a database row: {0}")]
    ConversionEntityError(String),
    #[error("database query failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to run a transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("key-value store operation failed")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("password hashing failed")]
    PasswordCryptError(#[from] bcrypt::BcryptError),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::UnprocessableEntity(_)
            | AppError::SlotUnavailable(_)
            | AppError::InvalidStatusTransition(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ResourceConflict(_) => StatusCode::CONFLICT,
            e @ (AppError::ConversionEntityError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::PasswordCryptError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Persistence-layer detail never reaches the client.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            "unexpected error happened".to_string()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()
    }
}
