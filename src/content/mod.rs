//! Learning-path content
//!
//! Provides the content model, the content API client, loading with a
//! bundled fallback, and practice question generation.

pub mod client;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod model;
pub mod quizgen;

// Re-export commonly used types
pub use client::{ApiClient, FileUpload, UploadedFile};
pub use error::ContentError;
pub use loader::{ContentLoader, ContentOrigin, ContentSource, LoadedPath};
pub use model::{Difficulty, Lesson, Media, Module, Question, Quiz, QuizConfig};
