// src/error.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    pub fn poll_not_found() -> Self {
        AppError::NotFound("Poll not found.".to_string())
    }

    pub fn option_not_found() -> Self {
        AppError::NotFound("Poll option not found.".to_string())
    }

    pub fn missing_field(field: &str) -> Self {
        AppError::Validation(format!("Field \"{field}\" is required."))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let msg = match &self {
            AppError::Database(e) => {
                error!("Database error: {e}");
                "Internal server error.".to_string()
            }
            AppError::Migration(e) => {
                error!("Migration error: {e}");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "msg": msg }))).into_response()
    }
}

/// True when the store rejected a write because of a `UNIQUE` constraint.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
