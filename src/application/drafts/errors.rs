use crate::domain::draft::workspace::WorkspaceError;
use crate::domain::shared::errors::DomainError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Repository(#[from] DomainError),
}
