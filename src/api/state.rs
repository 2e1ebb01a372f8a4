//! Application state for the API server.

use std::sync::Arc;

use crate::db::{Database, EntryRepository};

/// Shared application state.
///
/// Generic over `D: Database`, so handlers never see which backend serves
/// them. The database is opened and migrated before the state is built.
pub struct AppState<D: Database> {
    db: Arc<D>,
}

// Manual Clone impl - only the Arc needs to be cloneable, not D
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl<D: Database> AppState<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Entry repository over the shared pool.
    pub fn entries(&self) -> EntryRepository<D::Entries> {
        EntryRepository::new(self.db.entry_store())
    }

    /// Driver registry over the shared pool.
    pub fn drivers(&self) -> D::Drivers {
        self.db.drivers()
    }
}
