//! Durable service preferences
//!
//! A small key/value document recording whether the service is meant to be
//! running and how many worker events have been processed. Both values
//! survive process and device restarts; everything else about the service
//! is ephemeral.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use macrod_core::prelude::*;

const PREFS_FILENAME: &str = "prefs.toml";

/// The persisted document
///
/// Field names are the storage keys; defaults apply to a fresh install and
/// to any unreadable or partial file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Durable intent: should the service be running?
    pub service_enabled: bool,
    /// Monotonic count of recorded worker events
    pub macros_executed_count: u64,
}

/// Durable store for [`Prefs`]
///
/// Setters commit synchronously before returning. A failed read yields
/// defaults; a failed write is logged and the in-memory value still
/// advances for the current process. There is no multi-key atomicity:
/// each setter rewrites the whole document, and callers tolerate a crash
/// between two related writes.
pub struct PrefsStore {
    path: PathBuf,
    cached: Mutex<Prefs>,
}

impl PrefsStore {
    /// Open the store in the given state directory, loading any existing
    /// document
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(PREFS_FILENAME);
        let cached = Mutex::new(Self::read(&path));
        Self { path, cached }
    }

    /// Shared handle constructor used by the runtime wiring
    pub fn open_shared(state_dir: &Path) -> Arc<Self> {
        Arc::new(Self::open(state_dir))
    }

    fn read(path: &Path) -> Prefs {
        if !path.exists() {
            debug!("No prefs file at {:?}, using defaults", path);
            return Prefs::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(prefs) => {
                    debug!("Loaded prefs from {:?}", path);
                    prefs
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    Prefs::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                Prefs::default()
            }
        }
    }

    pub fn service_enabled(&self) -> bool {
        self.cached.lock().service_enabled
    }

    pub fn macros_executed_count(&self) -> u64 {
        self.cached.lock().macros_executed_count
    }

    /// Record the durable intent flag
    pub fn set_service_enabled(&self, enabled: bool) {
        let snapshot = {
            let mut prefs = self.cached.lock();
            prefs.service_enabled = enabled;
            prefs.clone()
        };
        debug!("Service enabled: {}", enabled);
        self.commit(&snapshot);
    }

    /// Increment the worker-event counter, returning the new count
    pub fn increment_macros_executed(&self) -> u64 {
        let (snapshot, count) = {
            let mut prefs = self.cached.lock();
            prefs.macros_executed_count += 1;
            (prefs.clone(), prefs.macros_executed_count)
        };
        self.commit(&snapshot);
        count
    }

    /// Synchronously commit the document
    ///
    /// Write failures are logged and otherwise ignored: the in-memory
    /// effect has already been applied for this process lifetime.
    fn commit(&self, prefs: &Prefs) {
        if let Err(e) = self.try_commit(prefs) {
            warn!("Durable write to {:?} did not commit: {}", self.path, e);
        }
    }

    fn try_commit(&self, prefs: &Prefs) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("create state dir: {}", e)))?;
        }

        let content = toml::to_string(prefs)
            .map_err(|e| Error::storage(format!("serialize prefs: {}", e)))?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| Error::storage(format!("open prefs file: {}", e)))?;

        // Exclusive lock against a concurrent writer on the same document
        file.lock_exclusive()
            .map_err(|e| Error::storage(format!("lock prefs file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::storage(format!("write prefs file: {}", e)))?;
        file.flush()
            .map_err(|e| Error::storage(format!("flush prefs file: {}", e)))?;

        Ok(())
    }

    /// Path of the underlying document (diagnostics)
    pub fn path(&self) -> &Path {
        &self.path
    }
}
