//! Storage and repository layer for the course feedback service.
//!
//! Records live in a [`FeedbackStore`] (a JSON file on disk or a vector in
//! memory). The [`FeedbackRepository`] sits on top and handles validation,
//! id assignment, ordering, deletion and statistics.
//!
//! # Examples
//! ```no_run
//! use std::sync::Arc;
//! use coursefeedback_lib::{FeedbackRepository, JsonFileStore, NewFeedback, Validation};
//!
//! # async fn demo() -> coursefeedback_lib::Result<()> {
//! let store = Arc::new(JsonFileStore::new("data/feedback.json"));
//! let repo = FeedbackRepository::new(store, Validation::Strict);
//! let record = repo
//!     .create(&NewFeedback::new("Alice", "cs101", "Great course", 5))
//!     .await?;
//! assert_eq!(record.course_code, "CS101");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod repository;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{FeedbackError, Result};
pub use model::{FeedbackRecord, NewFeedback};
pub use repository::{DatabaseInfo, FeedbackRepository};
pub use stats::FeedbackStats;
pub use store::{CorruptPolicy, FeedbackStore, JsonFileStore, MemoryStore, StoreKind};
pub use validate::Validation;
