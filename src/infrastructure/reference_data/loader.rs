use crate::domain::blueprint::{
    resolver::{BlueprintError, BlueprintResolver},
    schema::BlueprintSchema,
};
use crate::domain::pincode::entity::RawPincodeRow;
use crate::domain::reference::{index::ReferenceIndex, snapshot::ReferenceData};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pincode table {} is not valid CSV: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Zone blueprint is unusable: {0}")]
    Blueprint(#[from] BlueprintError),

    #[error("Reference build was interrupted: {0}")]
    Worker(String),
}

/// Reads both datasets and builds the immutable reference snapshot.
pub async fn load_reference_data(
    pincode_path: &Path,
    blueprint_path: &Path,
) -> Result<ReferenceData, ReferenceLoadError> {
    let started = Instant::now();
    let (pincode_bytes, blueprint_bytes) =
        tokio::try_join!(read(pincode_path), read(blueprint_path))?;

    let resolver = parse_blueprint(&blueprint_bytes).map_err(|err| match err {
        ParseFailure::Json(source) => ReferenceLoadError::Json {
            path: blueprint_path.to_path_buf(),
            source,
        },
        ParseFailure::Blueprint(err) => ReferenceLoadError::Blueprint(err),
    })?;
    let rows = parse_pincode_rows(pincode_path, &pincode_bytes)?;
    debug!(rows = rows.len(), zones = resolver.zones().count(), "Reference files parsed");

    let data = tokio::task::spawn_blocking(move || {
        let index = ReferenceIndex::build(rows, &resolver);
        ReferenceData::new(index, resolver)
    })
    .await
    .map_err(|e| ReferenceLoadError::Worker(e.to_string()))?;

    info!(
        pincodes = data.index.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Reference data loaded"
    );
    Ok(data)
}

/// Pincode rows from a `.json` array or, for anything else, a headed CSV.
pub fn parse_pincode_rows(path: &Path, data: &[u8]) -> Result<Vec<RawPincodeRow>, ReferenceLoadError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return serde_json::from_slice(data).map_err(|source| ReferenceLoadError::Json {
            path: path.to_path_buf(),
            source,
        });
    }

    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data)
        .deserialize()
        .collect::<Result<Vec<RawPincodeRow>, _>>()
        .map_err(|source| ReferenceLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

enum ParseFailure {
    Json(serde_json::Error),
    Blueprint(BlueprintError),
}

fn parse_blueprint(data: &[u8]) -> Result<BlueprintResolver, ParseFailure> {
    let schema: BlueprintSchema = serde_json::from_slice(data).map_err(ParseFailure::Json)?;
    BlueprintResolver::from_schema(schema).map_err(ParseFailure::Blueprint)
}

async fn read(path: &Path) -> Result<Vec<u8>, ReferenceLoadError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ReferenceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}
