use crate::{
    application::{
        drafts::use_case::DraftUseCase,
        ingestion::use_case::IngestZoneFileUseCase,
    },
    config::Config,
    domain::{draft::repository::DraftRepository, reference::snapshot::ReferenceData},
    infrastructure::{
        reference_data::store::ReferenceStore, security::upload_validation::UploadValidator,
    },
    presentation::http::errors::AppError,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub reference: ReferenceStore,
    pub ingestion: Arc<IngestZoneFileUseCase>,
    pub drafts: Arc<DraftUseCase>,
}

impl AppState {
    pub fn new(config: Config, reference: ReferenceStore, repository: Arc<dyn DraftRepository>) -> Self {
        let ingestion = IngestZoneFileUseCase::new(
            UploadValidator::new(config.upload_validation()),
            config.ingestion_settings(),
        );
        Self {
            ingestion: Arc::new(ingestion),
            drafts: Arc::new(DraftUseCase::new(repository)),
            reference,
            config,
        }
    }

    /// The loaded reference snapshot, or 503 while it is unavailable.
    pub async fn reference_data(&self) -> Result<Arc<ReferenceData>, AppError> {
        Ok(self.reference.current().await?)
    }
}
