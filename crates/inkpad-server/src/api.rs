//! Shared plumbing for inkpad request handlers.

use crate::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inkpad_models::ModelError;
use rusqlite::TransactionBehavior;
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::UserNotFound(_) | ModelError::AuthorNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ModelError::UserHasArticles { .. } => ApiError::Conflict(e.to_string()),
            ModelError::Database(_) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

/// `NotFound` for a user id that an absent lookup was expected to find.
pub(crate) fn user_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("user not found: {id}"))
}

/// Runs `work` inside one database transaction on the blocking pool.
///
/// The transaction commits only when `work` returns `Ok`; any error drops it
/// and SQLite rolls the changes back.
///
/// Takes the write lock up front (`BEGIN IMMEDIATE`) so a unit that reads
/// before it writes waits on the busy timeout instead of failing its lock
/// upgrade after another connection commits.
pub(crate) async fn run_unit_of_work<T, F>(state: Arc<AppState>, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ApiError::InternalServerError(format!("db transaction failed: {}", e)))?;

        let value = work(&tx)?;

        tx.commit()
            .map_err(|e| ApiError::InternalServerError(format!("db commit failed: {}", e)))?;

        Ok(value)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))?
}
