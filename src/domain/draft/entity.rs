use super::workspace::ZoneWorkspace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A vendor's zone configuration that has not been handed off yet.
///
/// # Lifecycle
/// 1. **Created** - empty interactive draft, or pre-filled from an upload
/// 2. **Edited** - zones selected, cities assigned, prices entered
/// 3. **Finalized** - output handed to the vendor-creation flow; the draft
///    itself is never written anywhere durable by this service
///
/// # Invariants
/// - `id` is unique across all drafts
/// - `updated_at` is bumped on every successful mutation
#[derive(Debug, Clone)]
pub struct VendorZoneDraft {
    pub id: Uuid,
    pub vendor_id: Option<String>,
    pub source: DraftSource,
    pub workspace: ZoneWorkspace,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DraftSource {
    Interactive,
    Upload,
}

impl VendorZoneDraft {
    pub fn new(vendor_id: Option<String>, source: DraftSource, workspace: ZoneWorkspace) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            vendor_id,
            source,
            workspace,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
