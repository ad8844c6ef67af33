pub mod upload_validation;

pub use upload_validation::{UploadValidationConfig, UploadValidationError, UploadValidator};
