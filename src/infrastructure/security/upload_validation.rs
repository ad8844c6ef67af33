use serde::Serialize;
use thiserror::Error;
use tracing::{instrument, warn};

pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "txt", "tsv", "xlsx", "xls", "xlsm"];
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Limits applied to uploaded zone files before any parsing.
#[derive(Debug, Clone)]
pub struct UploadValidationConfig {
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Default for UploadValidationConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum UploadValidationError {
    #[error("File is empty")]
    Empty,

    #[error("File size {size} exceeds maximum {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("File extension '{extension}' not allowed")]
    UnsupportedExtension { extension: String },
}

#[derive(Debug, Clone, Default)]
pub struct UploadValidator {
    config: UploadValidationConfig,
}

impl UploadValidator {
    pub fn new(config: UploadValidationConfig) -> Self {
        Self { config }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }

    /// Checks size and extension. Files without an extension pass; their
    /// format is sniffed from content later.
    #[instrument(skip(self, file_data), fields(size = file_data.len()))]
    pub fn validate(&self, file_data: &[u8], filename: &str) -> Result<(), UploadValidationError> {
        if file_data.is_empty() {
            return Err(UploadValidationError::Empty);
        }
        if file_data.len() > self.config.max_upload_bytes {
            warn!(limit = self.config.max_upload_bytes, "Upload rejected: too large");
            return Err(UploadValidationError::TooLarge {
                size: file_data.len(),
                limit: self.config.max_upload_bytes,
            });
        }
        if let Some(extension) = Self::extract_file_extension(filename) {
            if !self.config.allowed_extensions.contains(&extension) {
                warn!(extension = %extension, "Upload rejected: extension not allowed");
                return Err(UploadValidationError::UnsupportedExtension { extension });
            }
        }
        Ok(())
    }

    fn extract_file_extension(filename: &str) -> Option<String> {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
