use super::dto::{IssueKind, ParseIssue};
use crate::infrastructure::{
    security::upload_validation::UploadValidationError, spreadsheet::reader::ReaderError,
};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// What was learned about a file before ingestion gave up on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FailureContext {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub headers: Vec<String>,
    pub errors: Vec<ParseIssue>,
    pub error_count: usize,
}

/// Structural failures that abort an upload as a whole.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("The uploaded file is empty")]
    EmptyFile,

    #[error("Unsupported file type '{extension}'. Upload a .csv, .txt, .tsv, .xlsx, .xls or .xlsm file")]
    UnsupportedFormat { extension: String },

    #[error("The uploaded file is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("The file could not be read: {0}")]
    Unreadable(#[from] ReaderError),

    #[error("The file has no data rows")]
    NoDataRows { context: FailureContext },

    #[error(
        "Could not find a {} column. Name the columns 'pincode' and 'zone', or download the template",
        .missing.join(" or ")
    )]
    MissingColumns {
        missing: Vec<&'static str>,
        context: FailureContext,
    },

    #[error("No valid pincode entries were found; fix the listed rows and upload again")]
    NoValidEntries { context: FailureContext },

    #[error("Workbook parsing was interrupted: {0}")]
    Worker(String),
}

impl IngestionError {
    pub fn kind(&self) -> IssueKind {
        match self {
            IngestionError::MissingColumns { .. } | IngestionError::NoDataRows { .. } => {
                IssueKind::MissingData
            }
            IngestionError::NoValidEntries { context } => context
                .errors
                .first()
                .map(|issue| issue.kind)
                .unwrap_or(IssueKind::MissingData),
            _ => IssueKind::FormatError,
        }
    }

    pub fn context(&self) -> Option<&FailureContext> {
        match self {
            IngestionError::NoDataRows { context }
            | IngestionError::MissingColumns { context, .. }
            | IngestionError::NoValidEntries { context } => Some(context),
            _ => None,
        }
    }
}

impl From<UploadValidationError> for IngestionError {
    fn from(err: UploadValidationError) -> Self {
        match err {
            UploadValidationError::Empty => IngestionError::EmptyFile,
            UploadValidationError::TooLarge { size, limit } => IngestionError::TooLarge { size, limit },
            UploadValidationError::UnsupportedExtension { extension } => {
                IngestionError::UnsupportedFormat { extension }
            }
        }
    }
}
