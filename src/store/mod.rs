pub mod file;
pub mod memory;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::FeedbackRecord;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Which backend a store is, as reported by health and info endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    File,
    Memory,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::File => write!(f, "JSON File"),
            StoreKind::Memory => write!(f, "Memory"),
        }
    }
}

/// What a file store does when its document cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Report `StoreUnreadable` to the caller.
    #[default]
    Error,
    /// Log a warning and behave as if the store were empty.
    Empty,
}

impl std::str::FromStr for CorruptPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CorruptPolicy::Error),
            "empty" => Ok(CorruptPolicy::Empty),
            other => Err(format!("unknown corrupt policy: {}", other)),
        }
    }
}

/// Whole-collection storage for feedback records. Implementations must be
/// thread-safe.
///
/// Stores only know how to load and replace the full array; ordering,
/// validation and identity live in the repository.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Make sure the backing storage exists. Idempotent.
    async fn ensure_store(&self) -> Result<()>;

    /// Every stored record, in storage order.
    async fn read_all(&self) -> Result<Vec<FeedbackRecord>>;

    /// Replace the stored collection with `records`.
    async fn write_all(&self, records: &[FeedbackRecord]) -> Result<()>;

    fn kind(&self) -> StoreKind;

    /// Location of the backing file, if there is one.
    fn path(&self) -> Option<PathBuf> {
        None
    }
}
