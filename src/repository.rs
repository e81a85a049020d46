use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::model::{FeedbackRecord, NewFeedback};
use crate::stats::FeedbackStats;
use crate::store::{FeedbackStore, StoreKind};
use crate::validate::{validate, Validation};

/// Description of the backing store plus its current statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: Option<PathBuf>,
    pub total_entries: usize,
    #[serde(flatten)]
    pub stats: FeedbackStats,
}

/// Domain operations over a [`FeedbackStore`].
///
/// The repository keeps no copy of the records. Each call re-reads the store,
/// and mutating calls rewrite it in full while holding `write_lock`, so two
/// requests in this process cannot overwrite each other's changes.
pub struct FeedbackRepository {
    store: Arc<dyn FeedbackStore>,
    validation: Validation,
    write_lock: Mutex<()>,
    last_id: AtomicI64,
}

impl FeedbackRepository {
    pub fn new(store: Arc<dyn FeedbackStore>, validation: Validation) -> Self {
        Self {
            store,
            validation,
            write_lock: Mutex::new(()),
            last_id: AtomicI64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<dyn FeedbackStore> {
        &self.store
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// All records, newest first.
    pub async fn list_all(&self) -> Result<Vec<FeedbackRecord>> {
        let mut records = self.store.read_all().await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Validate `input`, stamp it with an id and creation time, and store it
    /// at the front of the collection.
    pub async fn create(&self, input: &NewFeedback) -> Result<FeedbackRecord> {
        let valid = validate(input, self.validation)?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_all().await?;

        let created_at = Utc::now();
        let max_existing = records.iter().map(|r| r.id).max().unwrap_or(0);
        let record = FeedbackRecord {
            id: self.next_id(created_at, max_existing),
            student_name: valid.student_name,
            course_code: valid.course_code,
            comments: valid.comments,
            rating: valid.rating,
            created_at,
        };

        records.insert(0, record.clone());
        self.store.write_all(&records).await?;
        debug!(id = record.id, course = %record.course_code, "created feedback");
        Ok(record)
    }

    /// Remove the record with `id`. Returns `false` when no such record
    /// exists, in which case the store is not rewritten.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_all().await?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            return Ok(false);
        }
        self.store.write_all(&records).await?;
        debug!(id, "deleted feedback");
        Ok(true)
    }

    pub async fn compute_stats(&self) -> Result<FeedbackStats> {
        let records = self.store.read_all().await?;
        Ok(FeedbackStats::from_records(&records))
    }

    pub async fn database_info(&self) -> Result<DatabaseInfo> {
        let stats = self.compute_stats().await?;
        let kind = match self.store.kind() {
            StoreKind::File => "JSON File Database".to_string(),
            StoreKind::Memory => "Memory Database".to_string(),
        };
        Ok(DatabaseInfo {
            kind,
            path: self.store.path(),
            total_entries: stats.total,
            stats,
        })
    }

    /// Millisecond timestamp ids that never repeat: the next id is at least
    /// one past both the last id handed out and the largest id on disk.
    /// Callers must hold `write_lock`.
    fn next_id(&self, now: DateTime<Utc>, max_existing: i64) -> i64 {
        let last = self.last_id.load(Ordering::SeqCst);
        let id = now
            .timestamp_millis()
            .max(max_existing.saturating_add(1))
            .max(last.saturating_add(1));
        self.last_id.store(id, Ordering::SeqCst);
        id
    }
}

fn sort_newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
