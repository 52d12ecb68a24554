//! Loading learning paths with a static fallback

use std::future::Future;

use super::error::ContentError;
use super::fallback;
use super::model::{Difficulty, Module, RawModule};

/// Something that can deliver the raw modules of a learning path
pub trait ContentSource {
    /// Fetch the raw module list for a tier
    fn fetch_path(
        &self,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<Vec<RawModule>, ContentError>> + Send;
}

/// Where the modules of a loaded path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Served by the content API
    Remote,
    /// Bundled default content, used when the API is empty or unreachable
    Fallback,
}

/// A fully loaded learning path
///
/// Progress can only be restored against a `LoadedPath`, so there is no way
/// to validate saved progress against a module list that is still loading.
#[derive(Debug, Clone)]
pub struct LoadedPath {
    pub difficulty: Difficulty,
    pub modules: Vec<Module>,
    pub origin: ContentOrigin,
}

impl LoadedPath {
    /// Build a path from modules that are already in memory
    pub fn new(difficulty: Difficulty, modules: Vec<Module>, origin: ContentOrigin) -> Self {
        Self { difficulty, modules, origin }
    }

    /// The bundled default content for a tier
    pub fn fallback(difficulty: Difficulty) -> Self {
        Self::new(difficulty, fallback::modules(difficulty), ContentOrigin::Fallback)
    }
}

/// Loads learning paths from a content source
pub struct ContentLoader<S> {
    source: S,
}

impl<S: ContentSource> ContentLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Access the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the modules of a tier
    ///
    /// The only error returned is `ContentError::Deactivated`. Every other
    /// failure, and an empty module list, falls back to the bundled content.
    pub async fn load_modules(&self, difficulty: Difficulty) -> Result<LoadedPath, ContentError> {
        match self.source.fetch_path(difficulty).await {
            Ok(raw) if !raw.is_empty() => {
                let modules: Vec<Module> =
                    raw.into_iter().map(|m| m.normalize(difficulty)).collect();
                tracing::info!(%difficulty, count = modules.len(), "loaded learning path");
                Ok(LoadedPath::new(difficulty, modules, ContentOrigin::Remote))
            }
            Ok(_) => {
                tracing::info!(%difficulty, "learning path has no content yet, using defaults");
                Ok(LoadedPath::fallback(difficulty))
            }
            Err(e) if e.is_deactivated() => {
                tracing::warn!(%difficulty, "learning path is deactivated: {}", e);
                Err(e)
            }
            Err(e) => {
                tracing::warn!(%difficulty, "failed to load learning path, using defaults: {}", e);
                Ok(LoadedPath::fallback(difficulty))
            }
        }
    }
}
