//! In-memory snapshot cache keyed by the snapshot file's mtime.
//!
//! Readers always receive a whole `Arc<Catalog>`; the slot is swapped under
//! a write lock only when a newer file is detected, so a catalog is never
//! observed half-reloaded. A missing or corrupt snapshot degrades to an
//! empty catalog rather than an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, warn};

use tuankb_core::models::Catalog;
use tuankb_core::snapshot;

#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("snapshot missing at {0}")]
    Missing(PathBuf),
    #[error("snapshot unreadable: {0}")]
    Unreadable(anyhow::Error),
}

struct CacheSlot {
    mtime: Option<SystemTime>,
    catalog: Arc<Catalog>,
}

pub struct SnapshotCache {
    path: PathBuf,
    slot: RwLock<CacheSlot>,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotCache {
            path: path.into(),
            slot: RwLock::new(CacheSlot {
                mtime: None,
                catalog: Arc::new(Catalog::empty()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current catalog, reloading first if the file's mtime changed.
    pub fn current(&self) -> Arc<Catalog> {
        let mtime = fs::metadata(&self.path).and_then(|m| m.modified()).ok();

        {
            let slot = self.slot.read().expect("snapshot cache poisoned");
            if mtime.is_some() && slot.mtime == mtime {
                return Arc::clone(&slot.catalog);
            }
        }

        let catalog = match self.load(mtime) {
            Ok(catalog) => Arc::new(catalog),
            Err(SnapshotLoadError::Missing(path)) => {
                debug!(path = %path.display(), "snapshot missing, serving empty catalog");
                Arc::new(Catalog::empty())
            }
            Err(SnapshotLoadError::Unreadable(err)) => {
                warn!(error = %err, "snapshot unreadable, serving empty catalog");
                Arc::new(Catalog::empty())
            }
        };

        let mut slot = self.slot.write().expect("snapshot cache poisoned");
        slot.mtime = mtime;
        slot.catalog = Arc::clone(&catalog);
        catalog
    }

    fn load(&self, mtime: Option<SystemTime>) -> Result<Catalog, SnapshotLoadError> {
        if mtime.is_none() {
            return Err(SnapshotLoadError::Missing(self.path.clone()));
        }
        snapshot::load(&self.path).map_err(SnapshotLoadError::Unreadable)
    }
}
