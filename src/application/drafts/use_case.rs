use super::{dto::CreateDraftRequest, errors::DraftError};
use crate::domain::assignment::auto_fill::AutoFillReport;
use crate::domain::blueprint::lookup::{SelectionWarning, ZoneLookup};
use crate::domain::draft::{
    entity::{DraftSource, VendorZoneDraft},
    repository::DraftRepository,
    workspace::{WorkspaceError, ZoneWorkspace},
};
use crate::domain::reference::snapshot::ReferenceData;
use crate::domain::zone::{
    entity::{CityKey, ZoneConfigurationOutput},
    value_objects::{Region, ZoneCode},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Interactive editing of vendor zone drafts.
///
/// Every mutation loads the draft, applies the change to an owned copy and
/// only writes it back when the change succeeded, so a rejected operation
/// leaves the stored draft untouched.
pub struct DraftUseCase {
    repository: Arc<dyn DraftRepository>,
}

impl DraftUseCase {
    pub fn new(repository: Arc<dyn DraftRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request, reference))]
    pub async fn create(
        &self,
        request: CreateDraftRequest,
        reference: &ReferenceData,
    ) -> Result<VendorZoneDraft, DraftError> {
        request
            .validate()
            .map_err(|e| DraftError::Invalid(e.to_string()))?;
        let workspace = ZoneWorkspace::new(reference.resolver.catalog().clone());
        let draft = VendorZoneDraft::new(request.vendor_id, DraftSource::Interactive, workspace);
        let draft = self.repository.create(&draft).await?;
        info!(draft_id = %draft.id, "Draft created");
        Ok(draft)
    }

    /// Opens an upload's folded configuration for further editing.
    #[instrument(skip(self, output, reference))]
    pub async fn create_from_upload(
        &self,
        vendor_id: Option<String>,
        output: ZoneConfigurationOutput,
        reference: &ReferenceData,
    ) -> Result<VendorZoneDraft, DraftError> {
        let workspace = ZoneWorkspace::from_output(output, reference.lookup())?;
        let draft = VendorZoneDraft::new(vendor_id, DraftSource::Upload, workspace);
        let draft = self.repository.create(&draft).await?;
        info!(draft_id = %draft.id, zones = draft.workspace.selected().len(), "Draft created from upload");
        Ok(draft)
    }

    pub async fn get(&self, id: Uuid) -> Result<VendorZoneDraft, DraftError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(DraftError::NotFound(id))
    }

    /// Drafts owned by one vendor, oldest first.
    pub async fn list_for_vendor(&self, vendor_id: &str) -> Result<Vec<VendorZoneDraft>, DraftError> {
        let vendor_id = vendor_id.trim();
        if vendor_id.is_empty() {
            return Err(DraftError::Invalid("vendorId must not be blank".to_string()));
        }
        Ok(self.repository.find_by_vendor(vendor_id).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DraftError> {
        self.get(id).await?;
        self.repository.delete(id).await?;
        Ok(())
    }

    pub async fn select_zone(
        &self,
        id: Uuid,
        code: &ZoneCode,
        reference: &ReferenceData,
    ) -> Result<VendorZoneDraft, DraftError> {
        let (draft, ()) = self
            .mutate(id, |ws| ws.select_zone(code, reference.lookup()))
            .await?;
        Ok(draft)
    }

    pub async fn deselect_zone(&self, id: Uuid, code: &ZoneCode) -> Result<VendorZoneDraft, DraftError> {
        let (draft, ()) = self.mutate(id, |ws| ws.deselect_zone(code)).await?;
        Ok(draft)
    }

    pub async fn toggle_zone(
        &self,
        id: Uuid,
        code: &ZoneCode,
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, bool), DraftError> {
        self.mutate(id, |ws| ws.toggle_zone(code, reference.lookup()))
            .await
    }

    pub async fn select_region(
        &self,
        id: Uuid,
        region: Region,
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, Vec<ZoneCode>), DraftError> {
        self.mutate(id, |ws| Ok(ws.select_region(region, reference.lookup())))
            .await
    }

    pub async fn deselect_region(
        &self,
        id: Uuid,
        region: Region,
    ) -> Result<(VendorZoneDraft, Vec<ZoneCode>), DraftError> {
        self.mutate(id, |ws| Ok(ws.deselect_region(region))).await
    }

    pub async fn select_all(
        &self,
        id: Uuid,
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, Vec<ZoneCode>), DraftError> {
        self.mutate(id, |ws| Ok(ws.select_all(reference.lookup())))
            .await
    }

    pub async fn deselect_all(&self, id: Uuid) -> Result<(VendorZoneDraft, Vec<ZoneCode>), DraftError> {
        self.mutate(id, |ws| Ok(ws.deselect_all())).await
    }

    pub async fn available_cities(
        &self,
        id: Uuid,
        code: &ZoneCode,
        reference: &ReferenceData,
    ) -> Result<Vec<CityKey>, DraftError> {
        let draft = self.get(id).await?;
        Ok(draft
            .workspace
            .available_cities(code, reference.lookup(), &reference.index)?)
    }

    pub async fn assign_cities(
        &self,
        id: Uuid,
        code: &ZoneCode,
        cities: &[CityKey],
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, usize), DraftError> {
        self.mutate(id, |ws| {
            ws.assign_cities(code, cities, reference.lookup(), &reference.index)
        })
        .await
    }

    pub async fn unassign_cities(
        &self,
        id: Uuid,
        code: &ZoneCode,
        cities: &[CityKey],
    ) -> Result<(VendorZoneDraft, usize), DraftError> {
        self.mutate(id, |ws| ws.unassign_cities(code, cities)).await
    }

    pub async fn assign_state(
        &self,
        id: Uuid,
        code: &ZoneCode,
        state: &str,
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, Vec<CityKey>), DraftError> {
        self.mutate(id, |ws| {
            ws.assign_state(code, state, reference.lookup(), &reference.index)
        })
        .await
    }

    pub async fn unassign_state(
        &self,
        id: Uuid,
        code: &ZoneCode,
        state: &str,
    ) -> Result<(VendorZoneDraft, Vec<CityKey>), DraftError> {
        self.mutate(id, |ws| ws.unassign_state(code, state)).await
    }

    pub async fn complete_zone(
        &self,
        id: Uuid,
        code: &ZoneCode,
        complete: bool,
    ) -> Result<VendorZoneDraft, DraftError> {
        let (draft, ()) = self
            .mutate(id, |ws| ws.complete_zone(code, complete))
            .await?;
        Ok(draft)
    }

    #[instrument(skip(self, reference))]
    pub async fn auto_fill(
        &self,
        id: Uuid,
        reference: &ReferenceData,
    ) -> Result<(VendorZoneDraft, AutoFillReport), DraftError> {
        self.mutate(id, |ws| Ok(ws.auto_fill(reference.lookup(), &reference.index)))
            .await
    }

    pub async fn warnings(
        &self,
        id: Uuid,
        reference: &ReferenceData,
    ) -> Result<Vec<SelectionWarning>, DraftError> {
        let draft = self.get(id).await?;
        Ok(draft.workspace.warnings(reference.lookup()))
    }

    pub async fn set_price(
        &self,
        id: Uuid,
        from: &ZoneCode,
        to: &ZoneCode,
        price: f64,
    ) -> Result<VendorZoneDraft, DraftError> {
        let (draft, ()) = self
            .mutate(id, |ws| ws.set_price(from, to, price))
            .await?;
        Ok(draft)
    }

    pub async fn paste_prices(&self, id: Uuid, text: &str) -> Result<(VendorZoneDraft, usize), DraftError> {
        self.mutate(id, |ws| ws.paste_prices(text)).await
    }

    /// The configuration handed to the vendor-creation flow. The draft stays
    /// editable; finalizing does not consume it.
    #[instrument(skip(self))]
    pub async fn finalize(
        &self,
        id: Uuid,
        confirm_empty_zones: bool,
    ) -> Result<ZoneConfigurationOutput, DraftError> {
        let draft = self.get(id).await?;
        let output = draft.workspace.finalize(confirm_empty_zones)?;
        info!(
            draft_id = %id,
            vendor_id = ?draft.vendor_id,
            zones = output.zones.len(),
            "Draft finalized"
        );
        Ok(output)
    }

    async fn mutate<T>(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut ZoneWorkspace) -> Result<T, WorkspaceError>,
    ) -> Result<(VendorZoneDraft, T), DraftError> {
        let mut draft = self.get(id).await?;
        let outcome = change(&mut draft.workspace).map_err(|e| {
            warn!(draft_id = %id, error = %e, "Draft change rejected");
            e
        })?;
        draft.touch();
        let draft = self.repository.update(&draft).await?;
        Ok((draft, outcome))
    }
}
