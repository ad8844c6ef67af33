use super::entity::VendorZoneDraft;
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn create(&self, draft: &VendorZoneDraft) -> Result<VendorZoneDraft, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VendorZoneDraft>, DomainError>;
    async fn update(&self, draft: &VendorZoneDraft) -> Result<VendorZoneDraft, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn find_by_vendor(&self, vendor_id: &str) -> Result<Vec<VendorZoneDraft>, DomainError>;
}
