// ============================================================
// Layer 2 — Fix Notebook Use Case
// ============================================================
//   Step 1: Read the notebook JSON        (Layer 6 - infra)
//   Step 2: Drop metadata.widgets         (Layer 3 - domain)
//   Step 3: Write it back, 2-space indent (Layer 6 - infra)
//
// The file is always rewritten, even when there was nothing to
// remove, so the output formatting is the same either way.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::notebook::strip_widget_metadata;
use crate::infra::notebook_store::NotebookStore;

pub struct FixNotebookUseCase {
    store: NotebookStore,
}

impl FixNotebookUseCase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { store: NotebookStore::new(path) }
    }

    /// Returns true when a widgets entry was removed
    pub fn execute(&self) -> Result<bool> {
        let mut notebook = self.store.load()?;
        let removed = strip_widget_metadata(&mut notebook)?;
        self.store.save(&notebook)?;

        tracing::debug!(
            "Rewrote '{}' (widgets removed: {})",
            self.store.path().display(),
            removed
        );
        Ok(removed)
    }
}
