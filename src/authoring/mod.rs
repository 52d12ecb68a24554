//! Authoring learning paths against the admin API
//!
//! Edits are applied to the local module list first and then sent to the
//! server. When the server call fails the local edit stays in place. Transient
//! failures are queued, so the author can keep working and reconcile later
//! with [`AuthoringWorkspace::retry_pending`]; a request the server rejected
//! outright is not retried.

use std::future::Future;

use crate::content::client::{FileUpload, UploadedFile};
use crate::content::error::ContentError;
use crate::content::model::{Difficulty, Module};

/// Admin operations of the content API
pub trait AdminApi {
    /// Create (`is_new`) or update a module
    fn save_module(
        &self,
        difficulty: Difficulty,
        module: &Module,
        is_new: bool,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;

    fn delete_module(
        &self,
        difficulty: Difficulty,
        module_id: &str,
    ) -> impl Future<Output = Result<(), ContentError>> + Send;

    /// Upload a media file, returning where the server stored it
    fn upload_file(
        &self,
        upload: FileUpload,
    ) -> impl Future<Output = Result<UploadedFile, ContentError>> + Send;

    fn delete_file(&self, file_url: &str) -> impl Future<Output = Result<(), ContentError>> + Send;
}

/// Whether a local edit reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    /// Applied locally only; the server call failed
    LocalOnly { reason: String },
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }
}

/// A server call that still has to be made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    Save { module_id: String, is_new: bool },
    Delete { module_id: String },
}

impl PendingOp {
    pub fn module_id(&self) -> &str {
        match self {
            PendingOp::Save { module_id, .. } | PendingOp::Delete { module_id } => module_id,
        }
    }
}

/// Local copy of one tier's modules being edited by an author
pub struct AuthoringWorkspace<A> {
    api: A,
    difficulty: Difficulty,
    modules: Vec<Module>,
    pending: Vec<PendingOp>,
}

impl<A: AdminApi> AuthoringWorkspace<A> {
    pub fn new(api: A, difficulty: Difficulty, modules: Vec<Module>) -> Self {
        Self { api, difficulty, modules, pending: Vec::new() }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Server calls that failed and have not been retried successfully
    pub fn pending(&self) -> &[PendingOp] {
        &self.pending
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Add a module, or replace the module with the same id
    pub async fn upsert_module(&mut self, mut module: Module) -> SyncStatus {
        module.difficulty = self.difficulty;
        let is_new = match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => {
                *existing = module.clone();
                false
            }
            None => {
                self.modules.push(module.clone());
                true
            }
        };

        let result = self.api.save_module(self.difficulty, &module, is_new).await;
        self.settle(PendingOp::Save { module_id: module.id, is_new }, result)
    }

    /// Remove a module; `None` when no such module exists locally
    pub async fn remove_module(&mut self, module_id: &str) -> Option<SyncStatus> {
        let index = self.modules.iter().position(|m| m.id == module_id)?;
        self.modules.remove(index);

        // A module that never reached the server needs no delete call
        let never_saved = self
            .pending
            .iter()
            .any(|op| matches!(op, PendingOp::Save { module_id: id, is_new: true } if id == module_id));
        if never_saved {
            self.pending.retain(|op| op.module_id() != module_id);
            return Some(SyncStatus::Synced);
        }

        let result = self.api.delete_module(self.difficulty, module_id).await;
        Some(self.settle(PendingOp::Delete { module_id: module_id.to_string() }, result))
    }

    /// Upload a media file
    pub async fn upload_file(&self, upload: FileUpload) -> Result<UploadedFile, ContentError> {
        tracing::debug!(file = %upload.file_name, size = upload.bytes.len(), "uploading file");
        self.api.upload_file(upload).await
    }

    /// Delete an uploaded file; failures are reported but not queued
    pub async fn delete_file(&self, file_url: &str) -> SyncStatus {
        match self.api.delete_file(file_url).await {
            Ok(()) => SyncStatus::Synced,
            Err(e) => {
                tracing::warn!(%file_url, "failed to delete file: {}", e);
                SyncStatus::LocalOnly { reason: e.to_string() }
            }
        }
    }

    /// Replay queued server calls; returns how many are still pending
    pub async fn retry_pending(&mut self) -> usize {
        let queued = std::mem::take(&mut self.pending);
        for op in queued {
            let result = match &op {
                PendingOp::Save { module_id, is_new } => {
                    let Some(module) = self.modules.iter().find(|m| &m.id == module_id) else {
                        continue;
                    };
                    self.api.save_module(self.difficulty, module, *is_new).await
                }
                PendingOp::Delete { module_id } => {
                    self.api.delete_module(self.difficulty, module_id).await
                }
            };
            self.settle(op, result);
        }
        self.pending.len()
    }

    /// Record the outcome of a server call for a module
    fn settle(&mut self, op: PendingOp, result: Result<(), ContentError>) -> SyncStatus {
        let module_id = op.module_id().to_string();
        match result {
            Ok(()) => {
                self.pending.retain(|queued| queued.module_id() != module_id);
                tracing::info!(module = %module_id, "module synced");
                SyncStatus::Synced
            }
            Err(e) if !e.is_recoverable() => {
                tracing::warn!(module = %module_id, "server rejected module change, kept locally: {}", e);
                self.pending.retain(|queued| queued.module_id() != module_id);
                SyncStatus::LocalOnly { reason: e.to_string() }
            }
            Err(e) => {
                tracing::warn!(module = %module_id, "module kept locally, sync failed: {}", e);
                let op = match (op, self.pending.iter().find(|q| q.module_id() == module_id)) {
                    // Still unknown to the server, so a later save must create it
                    (PendingOp::Save { module_id, .. }, Some(PendingOp::Save { is_new: true, .. })) => {
                        PendingOp::Save { module_id, is_new: true }
                    }
                    (op, _) => op,
                };
                self.pending.retain(|queued| queued.module_id() != module_id);
                self.pending.push(op);
                SyncStatus::LocalOnly { reason: e.to_string() }
            }
        }
    }
}
