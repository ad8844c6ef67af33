//! HTTP error handling and response conversion.
//!
//! Every component error is mapped to a status code and a JSON body of the
//! form `{"error": "..."}`. Ingestion failures additionally carry `kind` and
//! `details` so the upload screen can show what was detected before the file
//! was rejected.

use crate::application::drafts::errors::DraftError;
use crate::application::ingestion::{dto::IssueKind, errors::FailureContext, errors::IngestionError};
use crate::domain::draft::workspace::WorkspaceError;
use crate::domain::pricing::matrix::MatrixError;
use crate::domain::selection::state_machine::SelectionError;
use crate::domain::shared::errors::DomainError;
use crate::infrastructure::reference_data::store::ReferenceStatus;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found (404).
    NotFound(String),

    /// Malformed request input (400).
    BadRequest(String),

    /// Request data failed validation (400).
    ValidationError(String),

    /// Operation not allowed in the draft's current state (409).
    Conflict(String),

    /// Upload above the configured size cap (413).
    PayloadTooLarge(String),

    /// Upload in a format that cannot be parsed (415).
    UnsupportedMediaType(String),

    /// Upload was readable but unusable as a zone file (422).
    Ingestion {
        message: String,
        kind: IssueKind,
        details: Option<FailureContext>,
    },

    /// Reference data still loading or failed to load (503).
    ServiceUnavailable(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            Self::Ingestion { message, kind, .. } => {
                write!(f, "Ingestion failed ({:?}): {}", kind, message)
            }
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Ingestion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::ValidationError(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg)
            | Self::UnsupportedMediaType(msg)
            | Self::ServiceUnavailable(msg) => msg.clone(),
            Self::Ingestion { message, .. } => message.clone(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!("error={}", self);
            }
            _ => {
                tracing::warn!("error={}", self);
            }
        }

        let body = match self {
            Self::Ingestion { kind, details, .. } => json!({
                "error": message,
                "kind": kind,
                "details": details,
            }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::ValidationError(msg) => AppError::ValidationError(msg),
            DomainError::InfrastructureError(msg) => {
                tracing::error!(infrastructure_error = %msg);
                AppError::Internal(msg)
            }
        }
    }
}

impl From<WorkspaceError> for AppError {
    fn from(err: WorkspaceError) -> Self {
        let message = err.to_string();
        match err {
            WorkspaceError::Selection(SelectionError::UnknownZone { .. }) => {
                AppError::NotFound(message)
            }
            WorkspaceError::Matrix(
                MatrixError::InvalidPrice { .. }
                | MatrixError::RowCountMismatch { .. }
                | MatrixError::ColumnCountMismatch { .. }
                | MatrixError::InvalidCell { .. }
                | MatrixError::EmptyPaste,
            ) => AppError::ValidationError(message),
            _ => AppError::Conflict(message),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::NotFound(_) => AppError::NotFound(err.to_string()),
            DraftError::Invalid(msg) => AppError::ValidationError(msg),
            DraftError::Workspace(err) => err.into(),
            DraftError::Repository(err) => err.into(),
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(err: IngestionError) -> Self {
        let message = err.to_string();
        match err {
            IngestionError::EmptyFile => AppError::BadRequest(message),
            IngestionError::TooLarge { .. } => AppError::PayloadTooLarge(message),
            IngestionError::UnsupportedFormat { .. } => AppError::UnsupportedMediaType(message),
            IngestionError::Worker(_) => AppError::Internal(message),
            _ => AppError::Ingestion {
                kind: err.kind(),
                details: err.context().cloned(),
                message,
            },
        }
    }
}

impl From<ReferenceStatus> for AppError {
    fn from(status: ReferenceStatus) -> Self {
        match status {
            ReferenceStatus::Failed(reason) => {
                AppError::ServiceUnavailable(format!("Reference data failed to load: {}", reason))
            }
            _ => AppError::ServiceUnavailable(
                "Reference data is still loading, try again shortly".into(),
            ),
        }
    }
}

// === General Fallback Error Conversion ===

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(anyhow_error = %err, "Unclassified error with chain");
        err.chain().for_each(|cause| {
            tracing::error!(cause = %cause, "Error source");
        });
        AppError::Internal("Operation failed".into())
    }
}
