use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FeedbackStore, StoreKind};
use crate::error::Result;
use crate::model::FeedbackRecord;

/// In-memory feedback storage backed by a `RwLock<Vec>`. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<FeedbackRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn ensure_store(&self) -> Result<()> {
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<FeedbackRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn write_all(&self, records: &[FeedbackRecord]) -> Result<()> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }
}
