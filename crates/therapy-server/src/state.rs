use std::sync::Arc;
use therapy_analytics::StatsView;
use therapy_core::config::AppConfig;
use therapy_core::notes::NotesStore;
use therapy_core::transport::{self, ChatTransport};
use tokio::sync::RwLock;

/// Shared application state for the server.
///
/// The lock around the view is the single writer for session data: every
/// mutation and its stats recomputation happen under it.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub view: Arc<RwLock<StatsView>>,
    pub transport: Arc<dyn ChatTransport>,
    pub notes: Arc<RwLock<NotesStore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let transport = transport::from_config(&config.transport)?;
        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: AppConfig,
        transport: Arc<dyn ChatTransport>,
    ) -> anyhow::Result<Self> {
        let notes = match &config.notes.path {
            Some(path) => NotesStore::open(path.clone())?,
            None => NotesStore::new(),
        };

        Ok(Self {
            config,
            view: Arc::new(RwLock::new(StatsView::new())),
            transport,
            notes: Arc::new(RwLock::new(notes)),
        })
    }
}
