use super::loader::load_reference_data;
use crate::domain::reference::snapshot::ReferenceData;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::error;

#[derive(Debug, Clone)]
pub enum ReferenceStatus {
    Loading,
    Ready(Arc<ReferenceData>),
    Failed(String),
}

impl ReferenceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceStatus::Loading => "loading",
            ReferenceStatus::Ready(_) => "ready",
            ReferenceStatus::Failed(_) => "failed",
        }
    }
}

/// Shared handle to the reference snapshot.
///
/// Starts out `Loading`; callers that need the data before it is `Ready` get
/// the current status back instead of an empty index.
#[derive(Clone)]
pub struct ReferenceStore {
    status: Arc<RwLock<ReferenceStatus>>,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self {
            status: Arc::new(RwLock::new(ReferenceStatus::Loading)),
        }
    }

    pub fn ready(data: ReferenceData) -> Self {
        Self {
            status: Arc::new(RwLock::new(ReferenceStatus::Ready(Arc::new(data)))),
        }
    }

    pub async fn status(&self) -> ReferenceStatus {
        self.status.read().await.clone()
    }

    pub async fn current(&self) -> Result<Arc<ReferenceData>, ReferenceStatus> {
        match &*self.status.read().await {
            ReferenceStatus::Ready(data) => Ok(data.clone()),
            other => Err(other.clone()),
        }
    }

    pub async fn set_ready(&self, data: ReferenceData) {
        *self.status.write().await = ReferenceStatus::Ready(Arc::new(data));
    }

    pub async fn set_failed(&self, reason: String) {
        *self.status.write().await = ReferenceStatus::Failed(reason);
    }

    /// Loads both datasets in the background and publishes the outcome.
    pub fn spawn_load(&self, pincode_path: PathBuf, blueprint_path: PathBuf) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            match load_reference_data(&pincode_path, &blueprint_path).await {
                Ok(data) => store.set_ready(data).await,
                Err(e) => {
                    error!(error = %e, "Reference data failed to load");
                    store.set_failed(e.to_string()).await;
                }
            }
        })
    }
}
