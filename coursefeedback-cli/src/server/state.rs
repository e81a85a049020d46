use std::sync::Arc;

use coursefeedback_lib::{FeedbackRepository, FeedbackStore, JsonFileStore, MemoryStore};

use super::config::{FeedbackConfig, StorageBackend};

/// Shared application state for the HTTP server.
pub struct AppState {
    pub repository: FeedbackRepository,
    pub config: Arc<FeedbackConfig>,
}

impl AppState {
    /// Build the store and repository described by `config`.
    pub fn from_config(config: FeedbackConfig) -> Arc<Self> {
        let store: Arc<dyn FeedbackStore> = match config.storage.backend {
            StorageBackend::File => Arc::new(
                JsonFileStore::new(&config.storage.data_file)
                    .with_corrupt_policy(config.storage.on_corrupt),
            ),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        let repository = FeedbackRepository::new(store, config.validation.mode);
        Arc::new(Self {
            repository,
            config: Arc::new(config),
        })
    }
}
