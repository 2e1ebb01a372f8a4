//! Process-wide storage handle with an explicit lifecycle.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db::{Database, DbResult, EntryRepository};

/// Observable lifecycle of a [`Storage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageState {
    Uninitialized,
    Ready,
    Closed,
}

enum Slot<D> {
    Uninitialized,
    Ready(Arc<D>),
    Closed,
}

/// Owns the one connection pool shared by every repository.
///
/// [`Storage::open`] connects and prepares the schema on first use and hands
/// out the same `Arc<D>` afterwards. A handle is only ever returned after
/// schema setup succeeded.
pub struct Storage<D: Database> {
    options: D::Options,
    slot: Mutex<Slot<D>>,
}

impl<D: Database> Storage<D> {
    pub fn new(options: D::Options) -> Self {
        Self {
            options,
            slot: Mutex::new(Slot::Uninitialized),
        }
    }

    /// Connect and migrate, or return the already open database.
    ///
    /// Reopens after [`Storage::close`].
    pub async fn open(&self) -> DbResult<Arc<D>> {
        let mut slot = self.slot.lock().await;

        match &*slot {
            Slot::Ready(db) => return Ok(Arc::clone(db)),
            Slot::Closed => info!("reopening closed storage"),
            Slot::Uninitialized => {}
        }

        let db = D::connect(&self.options).await?;
        if let Err(e) = db.migrate().await {
            db.close().await;
            return Err(e);
        }

        if db.is_degraded() {
            warn!(
                backend = db.backend(),
                "storage is running in degraded mode: data will not survive a restart"
            );
        } else {
            info!(backend = db.backend(), "storage ready");
        }

        let db = Arc::new(db);
        *slot = Slot::Ready(Arc::clone(&db));
        Ok(db)
    }

    /// Close the pool. Repositories built earlier stop working until reopened.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        if let Slot::Ready(db) = &*slot {
            db.close().await;
            info!(backend = db.backend(), "storage closed");
            *slot = Slot::Closed;
        }
    }

    pub async fn state(&self) -> StorageState {
        match &*self.slot.lock().await {
            Slot::Uninitialized => StorageState::Uninitialized,
            Slot::Ready(_) => StorageState::Ready,
            Slot::Closed => StorageState::Closed,
        }
    }

    /// Entry repository over the open database.
    pub async fn entries(&self) -> DbResult<EntryRepository<D::Entries>> {
        let db = self.open().await?;
        Ok(EntryRepository::new(db.entry_store()))
    }
}
