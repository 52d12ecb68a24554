//! Learner progress persistence
//!
//! Progress is kept per (user, tier) as a single JSON record in a key-value
//! store. Records are validated against the loaded modules on every load.

pub mod migrate;
pub mod record;
pub mod store;

// Re-exports
pub use migrate::{MigrationReport, migrate};
pub use record::{OverallProgress, ProgressRecord, QuizAttempt, attempt_key, is_path_completed};
pub use store::{FileStore, KeyValueStore, MemoryStore, ProgressStore, StoreError};
