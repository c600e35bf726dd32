use std::sync::Arc;

use rentcal_core::{SqliteStore, Syncer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    syncer: Arc<Syncer<SqliteStore>>,
}

impl AppState {
    pub fn new(syncer: Syncer<SqliteStore>) -> Self {
        AppState {
            syncer: Arc::new(syncer),
        }
    }

    pub fn syncer(&self) -> &Syncer<SqliteStore> {
        &self.syncer
    }

    pub fn store(&self) -> &SqliteStore {
        self.syncer.store()
    }

    /// Handle for background tasks.
    pub fn shared_syncer(&self) -> Arc<Syncer<SqliteStore>> {
        Arc::clone(&self.syncer)
    }
}
