//! Application configuration loading from environment variables.
//!
//! Everything has a default, so the service starts with no environment at all
//! and reads the bundled sample datasets under `./data`.
//!
//! # Environment Variables
//! - `RUST_LOG`: Logging level (default: "info,vendor_zones=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `PINCODE_DATA_PATH`: Pincode reference table, CSV or JSON (default: "./data/pincodes.csv")
//! - `ZONE_BLUEPRINT_PATH`: Zone blueprint JSON (default: "./data/zone_blueprint.json")
//! - `MAX_UPLOAD_BYTES`: Largest accepted zone file (default: 104857600)
//! - `MAX_REPORTED_ERRORS`: Row errors listed per upload (default: 50)
//! - `COLUMN_SAMPLE_SIZE`: Rows sampled per column during detection (default: 100)

use crate::application::ingestion::use_case::IngestionSettings;
use crate::infrastructure::security::upload_validation::{
    DEFAULT_MAX_UPLOAD_BYTES, UploadValidationConfig,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    pub pincode_data_path: PathBuf,

    pub zone_blueprint_path: PathBuf,

    /// Upload size cap in bytes, enforced before any parsing
    pub max_upload_bytes: usize,

    /// Row errors beyond this many are counted but not listed
    pub max_reported_errors: usize,

    pub column_sample_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            pincode_data_path: PathBuf::from("./data/pincodes.csv"),
            zone_blueprint_path: PathBuf::from("./data/zone_blueprint.json"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_reported_errors: 50,
            column_sample_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            pincode_data_path: env_or("PINCODE_DATA_PATH", defaults.pincode_data_path)?,
            zone_blueprint_path: env_or("ZONE_BLUEPRINT_PATH", defaults.zone_blueprint_path)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_reported_errors: env_or("MAX_REPORTED_ERRORS", defaults.max_reported_errors)?,
            column_sample_size: env_or("COLUMN_SAMPLE_SIZE", defaults.column_sample_size)?,
        }
        .validated()?)
    }

    fn validated(self) -> anyhow::Result<Self> {
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.column_sample_size == 0 {
            anyhow::bail!("COLUMN_SAMPLE_SIZE must be greater than zero");
        }
        Ok(self)
    }

    pub fn upload_validation(&self) -> UploadValidationConfig {
        UploadValidationConfig {
            max_upload_bytes: self.max_upload_bytes,
            ..UploadValidationConfig::default()
        }
    }

    pub fn ingestion_settings(&self) -> IngestionSettings {
        IngestionSettings {
            max_reported_errors: self.max_reported_errors,
            column_sample_size: self.column_sample_size,
        }
    }
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
