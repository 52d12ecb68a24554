//! Verdant - learner progress and quiz engine for gardening courses
//!
//! Verdant loads tiered learning paths (beginner, intermediate, expert) from
//! a content API, falls back to bundled modules when the API has nothing,
//! and tracks each learner's lessons, quiz attempts, and module unlocks.

pub mod authoring;
pub mod config;
pub mod content;
pub mod engine;
pub mod progress;

pub use authoring::{AdminApi, AuthoringWorkspace, SyncStatus};
pub use config::Config;
pub use content::{ApiClient, ContentError, ContentLoader, Difficulty, LoadedPath, Module};
pub use engine::{EngineError, LearningPath, View};
pub use progress::{FileStore, KeyValueStore, MemoryStore, ProgressStore};
