//! Storage schema versioning
//!
//! Older clients left progress under unscoped keys and under a flat layout
//! with one key per collection. The migration runs once at startup and
//! removes those keys, then stamps the current version for the signed-in
//! user (or for anonymous use).

use super::store::{KeyValueStore, LEARNING_PROGRESS_KEY, StoreError, scoped_key};
use crate::content::model::Difficulty;

/// Current storage schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Base key holding the schema version, scoped per user like progress keys
///
/// Which keys count as legacy depends on who is signed in, so an anonymous
/// run must not mark the store as migrated for a learner who signs in later.
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// Keys written by the flat pre-versioned layout
const FLAT_LEGACY_KEYS: &[&str] = &["completedModules", "moduleProgress", "quizAttempts"];

/// What a migration run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version found before the run (0 when unversioned)
    pub from_version: u32,
    /// Keys that were removed
    pub removed: Vec<String>,
}

impl MigrationReport {
    /// Whether the run changed anything
    pub fn migrated(&self) -> bool {
        self.from_version < SCHEMA_VERSION
    }
}

/// Storage key of the schema version for a user
pub fn version_key(user_id: Option<&str>) -> String {
    scoped_key(SCHEMA_VERSION_KEY, user_id)
}

/// Version stamped for a user, 0 when absent or unreadable
pub fn stored_version<S: KeyValueStore>(store: &S, user_id: Option<&str>) -> Result<u32, StoreError> {
    Ok(store.get(&version_key(user_id))?.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
}

/// Keys that belong to older layouts
///
/// Unscoped tier keys are only legacy when someone is signed in; without a
/// user they are the live keys.
pub fn legacy_keys(user_id: Option<&str>) -> Vec<String> {
    let mut keys: Vec<String> = FLAT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect();
    if user_id.is_some() {
        keys.extend(Difficulty::all().iter().map(|d| d.progress_key().to_string()));
        keys.push(LEARNING_PROGRESS_KEY.to_string());
    }
    keys
}

/// Bring the store up to the current schema version
pub fn migrate<S: KeyValueStore>(
    store: &mut S,
    user_id: Option<&str>,
) -> Result<MigrationReport, StoreError> {
    let from_version = stored_version(store, user_id)?;
    let mut report = MigrationReport { from_version, removed: Vec::new() };

    if from_version >= SCHEMA_VERSION {
        tracing::debug!(version = from_version, "storage schema is current");
        return Ok(report);
    }

    for key in legacy_keys(user_id) {
        if store.remove(&key)? {
            tracing::info!(%key, "removed legacy progress key");
            report.removed.push(key);
        }
    }

    store.set(&version_key(user_id), &SCHEMA_VERSION.to_string())?;
    tracing::info!(
        from = from_version,
        to = SCHEMA_VERSION,
        removed = report.removed.len(),
        "migrated storage schema"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::default();
        for key in ["expertProgress", "quizAttempts", "expertProgress_user_1", "learningProgress"] {
            store.set(key, "{}").unwrap();
        }
        store
    }

    #[test]
    fn removes_unscoped_and_flat_keys_for_signed_in_user() {
        let mut store = seeded();
        let report = migrate(&mut store, Some("1")).unwrap();

        assert!(report.migrated());
        assert_eq!(report.from_version, 0);
        let mut removed = report.removed.clone();
        removed.sort();
        assert_eq!(removed, vec!["expertProgress", "learningProgress", "quizAttempts"]);
        assert_eq!(
            store.keys().unwrap(),
            vec!["expertProgress_user_1".to_string(), "schemaVersion_user_1".to_string()]
        );
    }

    #[test]
    fn keeps_unscoped_keys_without_user() {
        let mut store = seeded();
        let report = migrate(&mut store, None).unwrap();

        assert_eq!(report.removed, vec!["quizAttempts".to_string()]);
        assert!(store.get("expertProgress").unwrap().is_some());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut store = seeded();
        migrate(&mut store, Some("1")).unwrap();
        store.set("expertProgress", "{}").unwrap();

        let report = migrate(&mut store, Some("1")).unwrap();
        assert!(!report.migrated());
        assert!(report.removed.is_empty());
        assert!(store.get("expertProgress").unwrap().is_some());
    }

    #[test]
    fn sign_in_after_anonymous_run_still_sweeps_bare_keys() {
        let mut store = seeded();
        migrate(&mut store, None).unwrap();
        assert!(store.get("expertProgress").unwrap().is_some());

        let report = migrate(&mut store, Some("1")).unwrap();
        assert!(report.migrated());
        assert!(report.removed.contains(&"expertProgress".to_string()));
        assert!(store.get("expertProgress").unwrap().is_none());
        assert_eq!(stored_version(&store, None).unwrap(), SCHEMA_VERSION);
        assert_eq!(stored_version(&store, Some("1")).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn garbage_version_counts_as_unversioned() {
        let mut store = MemoryStore::default();
        store.set(SCHEMA_VERSION_KEY, "abc").unwrap();
        assert_eq!(stored_version(&store, None).unwrap(), 0);
    }
}
