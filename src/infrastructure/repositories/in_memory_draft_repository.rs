use crate::domain::draft::{entity::VendorZoneDraft, repository::DraftRepository};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local draft storage. Drafts do not survive a restart; the calling
/// application persists finalized configurations itself.
#[derive(Default)]
pub struct InMemoryDraftRepository {
    drafts: RwLock<HashMap<Uuid, VendorZoneDraft>>,
}

impl InMemoryDraftRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn create(&self, draft: &VendorZoneDraft) -> Result<VendorZoneDraft, DomainError> {
        let mut drafts = self.drafts.write().await;
        if drafts.contains_key(&draft.id) {
            return Err(DomainError::ValidationError(format!(
                "Draft {} already exists",
                draft.id
            )));
        }
        drafts.insert(draft.id, draft.clone());
        Ok(draft.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VendorZoneDraft>, DomainError> {
        Ok(self.drafts.read().await.get(&id).cloned())
    }

    async fn update(&self, draft: &VendorZoneDraft) -> Result<VendorZoneDraft, DomainError> {
        let mut drafts = self.drafts.write().await;
        match drafts.get_mut(&draft.id) {
            Some(stored) => {
                *stored = draft.clone();
                Ok(draft.clone())
            }
            None => Err(DomainError::NotFound(format!("Draft {}", draft.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.drafts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Draft {}", id)))
    }

    async fn find_by_vendor(&self, vendor_id: &str) -> Result<Vec<VendorZoneDraft>, DomainError> {
        let mut drafts: Vec<VendorZoneDraft> = self
            .drafts
            .read()
            .await
            .values()
            .filter(|draft| draft.vendor_id.as_deref() == Some(vendor_id))
            .cloned()
            .collect();
        drafts.sort_by_key(|draft| (draft.created_at, draft.id));
        Ok(drafts)
    }
}
