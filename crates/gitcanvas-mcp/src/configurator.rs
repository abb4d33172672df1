use crate::types::{derive_descriptors, McpServerDescriptor, McpSettings};
use gitcanvas_core::WorkspaceStore;
use gitcanvas_events::{Event, EventBus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Keeps the remote tool list in sync with the workspace store.
///
/// The list is seeded from the store's current snapshot at construction, so
/// a configurator created after the repo/auth events already fired still
/// starts correct; afterwards it recomputes on every repo or auth change.
pub struct ToolConfigurator {
    store: Arc<WorkspaceStore>,
    settings: McpSettings,
    current: RwLock<Vec<McpServerDescriptor>>,
}

impl ToolConfigurator {
    pub fn new(store: Arc<WorkspaceStore>, settings: McpSettings) -> Self {
        let configurator = Self {
            store,
            settings,
            current: RwLock::new(Vec::new()),
        };
        configurator.recompute();
        configurator
    }

    pub fn descriptors(&self) -> Vec<McpServerDescriptor> {
        self.current.read().clone()
    }

    fn recompute(&self) {
        let selection = self.store.repo_selection();
        let session = self.store.auth_session();
        let descriptors = derive_descriptors(&self.settings, selection.as_ref(), &session);
        tracing::debug!(count = descriptors.len(), "remote tool list recomputed");
        *self.current.write() = descriptors;
    }

    /// Subscribe to the bus and recompute on repo/auth changes until the bus
    /// closes.
    pub fn spawn(self: &Arc<Self>, bus: &dyn EventBus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let this = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Event::RepoChanged { .. }) | Ok(Event::AuthChanged { .. }) => {
                        this.recompute()
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("tool configurator lagged, skipped {} events", skipped);
                        this.recompute();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
