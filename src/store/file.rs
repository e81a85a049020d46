use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{CorruptPolicy, FeedbackStore, StoreKind};
use crate::error::{FeedbackError, Result};
use crate::model::FeedbackRecord;

/// Feedback storage kept as one pretty-printed JSON array on disk.
///
/// Every write replaces the whole document. The new content is written to a
/// sibling temp file and renamed over the target, so a concurrent reader
/// sees either the old or the new array, never a partial one.
pub struct JsonFileStore {
    path: PathBuf,
    on_corrupt: CorruptPolicy,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_corrupt: CorruptPolicy::default(),
        }
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("feedback.json"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn create_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| FeedbackError::io(dir, e)),
            _ => Ok(()),
        }
    }

    fn unreadable(&self, reason: String) -> Result<Vec<FeedbackRecord>> {
        match self.on_corrupt {
            CorruptPolicy::Error => Err(FeedbackError::StoreUnreadable {
                path: self.path.clone(),
                reason,
            }),
            CorruptPolicy::Empty => {
                warn!(path = %self.path.display(), %reason, "treating unreadable store as empty");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl FeedbackStore for JsonFileStore {
    async fn ensure_store(&self) -> Result<()> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| FeedbackError::io(&self.path, e))?;
        if exists {
            return Ok(());
        }
        self.create_parent_dir().await?;
        tokio::fs::write(&self.path, b"[]")
            .await
            .map_err(|e| FeedbackError::io(&self.path, e))?;
        info!(path = %self.path.display(), "created new feedback store");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<FeedbackRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return self.unreadable(e.to_string()),
        };
        match serde_json::from_str::<Vec<FeedbackRecord>>(&content) {
            Ok(records) => {
                debug!(count = records.len(), "read feedback store");
                Ok(records)
            }
            Err(e) => self.unreadable(e.to_string()),
        }
    }

    async fn write_all(&self, records: &[FeedbackRecord]) -> Result<()> {
        let body = serde_json::to_vec_pretty(records)?;
        self.create_parent_dir().await?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| FeedbackError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| FeedbackError::io(&self.path, e))?;

        debug!(count = records.len(), path = %self.path.display(), "wrote feedback store");
        Ok(())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::File
    }

    fn path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}
