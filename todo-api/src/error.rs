//! Request-level errors and their HTTP translation.
//!
//! Handlers return `Result<_, TodoError>`; the `IntoResponse` impl is the only
//! place that picks status codes. "Not found" and "nothing created" are
//! decided by the handlers from empty row sets; everything the store throws
//! back becomes a 500 carrying the operation's message and the raw error text.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use store_client::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo with id {id} not found")]
    NotFound { id: i64 },

    #[error("Failed to create todo")]
    BadCreate,

    #[error("{message}: {detail}")]
    InvalidInput { message: &'static str, detail: String },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl TodoError {
    /// Adapter for `map_err` that tags a store failure with the operation's
    /// message and logs it inside the caller's span.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| {
            tracing::error!(error = %source, "{context}");
            TodoError::Store { context, source }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::NotFound { .. } => StatusCode::NOT_FOUND,
            TodoError::BadCreate | TodoError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            TodoError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathRejection> for TodoError {
    fn from(rejection: PathRejection) -> Self {
        TodoError::InvalidInput {
            message: "Invalid todo id",
            detail: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for TodoError {
    fn from(rejection: JsonRejection) -> Self {
        TodoError::InvalidInput {
            message: "Invalid todo payload",
            detail: rejection.body_text(),
        }
    }
}

/// `{ "message": .., "error": .. }`; `error` is omitted for the explicit
/// not-found and bad-create outcomes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            TodoError::InvalidInput { message, detail } => ErrorBody {
                message: message.to_string(),
                error: Some(detail),
            },
            TodoError::Store { context, source } => ErrorBody {
                message: context.to_string(),
                error: Some(source.to_string()),
            },
            explicit => ErrorBody {
                message: explicit.to_string(),
                error: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
