use super::{
    detection::{assign_roles, column_names, is_header_row, profile_columns, rank_candidates},
    dto::{ColumnRole, IngestZoneFileRequest, IngestionReport, SourceFormat},
    errors::{FailureContext, IngestionError},
    rows::parse_rows,
    sniff::{decode_text, sniff_delimiter, sniff_format},
    summary::{fold_entries, summarize},
};
use crate::domain::reference::snapshot::ReferenceData;
use crate::infrastructure::{
    security::upload_validation::UploadValidator,
    spreadsheet::reader::{Table, read_delimited, read_workbook},
};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy)]
pub struct IngestionSettings {
    pub max_reported_errors: usize,
    pub column_sample_size: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            max_reported_errors: 50,
            column_sample_size: 100,
        }
    }
}

/// Turns an uploaded zone file into validated entries and the shared zone
/// configuration shape.
///
/// # Pipeline
/// 1. Size and extension checks
/// 2. Format sniff, then delimited-text or workbook reading (the latter on a
///    blocking worker thread)
/// 3. Header and column-role detection
/// 4. Row parsing with per-row errors and warnings
/// 5. Per-zone summary and folding into zone configs
///
/// The same bytes always produce the same report.
pub struct IngestZoneFileUseCase {
    validator: UploadValidator,
    settings: IngestionSettings,
}

/// File-level facts carried from reading into analysis.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub file_name: String,
    pub format: SourceFormat,
    pub fingerprint: String,
}

impl IngestZoneFileUseCase {
    pub fn new(validator: UploadValidator, settings: IngestionSettings) -> Self {
        Self {
            validator,
            settings,
        }
    }

    #[instrument(skip(self, request, reference), fields(
        file = %request.file_name,
        size = request.data.len()
    ))]
    pub async fn execute(
        &self,
        request: &IngestZoneFileRequest,
        reference: &ReferenceData,
    ) -> Result<IngestionReport, IngestionError> {
        self.validator.validate(&request.data, &request.file_name)?;

        let fingerprint = {
            let mut hasher = Sha256::new();
            hasher.update(&request.data);
            format!("{:x}", hasher.finalize())
        };
        let format = sniff_format(&request.file_name, &request.data);
        debug!(format = ?format, fingerprint = &fingerprint[..16], "Upload sniffed");

        let table = match format {
            SourceFormat::Workbook => {
                let data = request.data.to_vec();
                tokio::task::spawn_blocking(move || read_workbook(data))
                    .await
                    .map_err(|e| IngestionError::Worker(e.to_string()))??
            }
            SourceFormat::Delimited => {
                let text = decode_text(&request.data);
                read_delimited(&text, sniff_delimiter(&text))?
            }
        };

        let source = SourceInfo {
            file_name: request.file_name.clone(),
            format,
            fingerprint,
        };
        analyze_table(table, source, reference, self.settings)
    }
}

/// Everything after reading: detection, parsing, summary and folding.
pub fn analyze_table(
    table: Table,
    source: SourceInfo,
    reference: &ReferenceData,
    settings: IngestionSettings,
) -> Result<IngestionReport, IngestionError> {
    if table.is_empty() {
        return Err(IngestionError::EmptyFile);
    }
    let is_state = |value: &str| reference.index.is_known_state(value);

    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    let header_detected = is_header_row(&table[0], &is_state);
    let headers = column_names(header_detected.then(|| table[0].as_slice()), width);
    let (data, first_row) = if header_detected {
        (&table[1..], 2)
    } else {
        (&table[..], 1)
    };

    let context = |errors, error_count, valid_rows| FailureContext {
        total_rows: data.len(),
        valid_rows,
        headers: headers.clone(),
        errors,
        error_count,
    };

    if data.is_empty() {
        return Err(IngestionError::NoDataRows {
            context: context(Vec::new(), 0, 0),
        });
    }

    let profiles = profile_columns(&headers, header_detected, data, settings.column_sample_size);
    let columns = assign_roles(&rank_candidates(&profiles, &is_state));
    debug!(
        header_detected,
        detections = ?columns.detections,
        "Columns detected"
    );

    let missing: Vec<&'static str> = [ColumnRole::Pincode, ColumnRole::Zone]
        .into_iter()
        .filter(|role| columns.get(*role).is_none())
        .map(ColumnRole::label)
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, headers = ?headers, "Required columns not found");
        return Err(IngestionError::MissingColumns {
            missing,
            context: context(Vec::new(), 0, 0),
        });
    }

    let outcome = parse_rows(
        data,
        first_row,
        &columns,
        &reference.index,
        settings.max_reported_errors,
    );
    if outcome.entries.is_empty() {
        warn!(errors = outcome.error_count, "Upload has no valid entries");
        return Err(IngestionError::NoValidEntries {
            context: context(outcome.errors, outcome.error_count, 0),
        });
    }

    let lookup = reference.lookup();
    let summary = summarize(&outcome.entries, lookup);
    let (configuration, conflicts) = fold_entries(&outcome.entries, lookup);
    let mut warnings = outcome.warnings;
    warnings.extend(conflicts);

    info!(
        file = %source.file_name,
        rows = data.len(),
        entries = outcome.entries.len(),
        errors = outcome.error_count,
        warnings = warnings.len(),
        zones = summary.len(),
        "Zone file ingested"
    );

    Ok(IngestionReport {
        file_name: source.file_name,
        format: source.format,
        fingerprint: source.fingerprint,
        header_detected,
        headers,
        columns,
        total_rows: data.len(),
        valid_rows: outcome.entries.len(),
        entries: outcome.entries,
        errors: outcome.errors,
        error_count: outcome.error_count,
        warnings,
        summary,
        configuration,
    })
}
