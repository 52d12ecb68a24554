//! Writing progress back after every change

use crate::content::model::{Difficulty, Module};
use crate::progress::record::{OverallProgress, ProgressRecord};
use crate::progress::store::{KeyValueStore, ProgressStore, StoreError};

/// Keeps the persisted record of one tier in step with the engine
pub struct ProgressSync<S> {
    store: ProgressStore<S>,
    difficulty: Difficulty,
}

impl<S: KeyValueStore> ProgressSync<S> {
    pub fn new(store: ProgressStore<S>, difficulty: Difficulty) -> Self {
        Self { store, difficulty }
    }

    /// Load and validate saved progress against the loaded modules
    pub fn restore(&self, modules: &[Module]) -> ProgressRecord {
        self.store.load(self.difficulty, modules)
    }

    /// Save a full snapshot and refresh the derived fields of `record`
    ///
    /// Skipped when no modules are loaded, since an empty path would read as
    /// vacuously complete. Returns whether a snapshot was written.
    pub fn persist(
        &mut self,
        modules: &[Module],
        record: &mut ProgressRecord,
    ) -> Result<bool, StoreError> {
        if modules.is_empty() {
            tracing::debug!(difficulty = %self.difficulty, "no modules loaded, not saving progress");
            return Ok(false);
        }
        *record = self.store.save(self.difficulty, modules, record)?;
        Ok(true)
    }

    /// Mark this tier as fully complete in the overall progress record
    pub fn record_path_completion(&mut self) -> Result<(), StoreError> {
        tracing::info!(difficulty = %self.difficulty, "learning path completed");
        self.store.set_overall(self.difficulty, 100)
    }

    /// Completion percentages across all tiers
    pub fn overall(&self) -> OverallProgress {
        self.store.load_overall()
    }

    /// The underlying progress store
    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }
}
