// src/exec/registry.rs

//! Bookkeeping of running process ids and their temp config files.
//!
//! The table is best-effort: the runner inserts an entry once the child has a
//! pid and removes it during cleanup. Something tearing a job down out of band
//! (e.g. after the scheduler killed the pid) can [`release`](ProcessRegistry::release)
//! the entry to get rid of the file. It is never consulted for correctness.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Shared pid -> temp file path table. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    entries: Arc<Mutex<HashMap<u32, PathBuf>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, PathBuf>> {
        // A panic while holding the lock can't leave the map half-updated.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, pid: u32, path: impl AsRef<Path>) {
        self.lock().insert(pid, path.as_ref().to_path_buf());
    }

    pub fn get(&self, pid: u32) -> Option<PathBuf> {
        self.lock().get(&pid).cloned()
    }

    pub fn remove(&self, pid: u32) -> Option<PathBuf> {
        self.lock().remove(&pid)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop the entry for `pid` and delete its temp file if it is still there.
    ///
    /// Returns the path that was released, if the pid was known.
    pub fn release(&self, pid: u32, fs: &dyn FileSystem) -> Option<PathBuf> {
        let path = self.remove(pid)?;
        if fs.exists(&path) {
            match fs.remove_file(&path) {
                Ok(()) => debug!(pid, path = ?path, "released temp job config"),
                Err(err) => warn!(pid, path = ?path, error = %err, "failed to release temp job config"),
            }
        }
        Some(path)
    }
}
