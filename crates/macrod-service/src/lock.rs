//! Single-instance lock
//!
//! At most one controller instance per state directory. An advisory file
//! lock is held for the daemon's whole lifetime; a second daemon pointed
//! at the same state directory fails fast at startup.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use macrod_core::prelude::*;

const LOCK_FILENAME: &str = "macrod.lock";

/// Held advisory lock; released on drop
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock in the given state directory
    ///
    /// Fails with `AlreadyRunning` when another live process holds it.
    pub fn acquire(state_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_dir)?;
        let path = state_dir.join(LOCK_FILENAME);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(Error::already_running(path));
        }

        // Pid breadcrumb for a human inspecting the state dir; the lock
        // itself is what enforces exclusivity
        file.set_len(0)?;
        let _ = writeln!(file, "{}", std::process::id());

        info!("Acquired instance lock at {:?}", path);
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.file) {
            warn!("Failed to release instance lock: {}", e);
        }
        debug!("Released instance lock at {:?}", self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let temp = tempdir().unwrap();
        let lock = InstanceLock::acquire(temp.path()).unwrap();
        assert!(lock.path().exists());
    }

    #[test]
    fn test_second_acquire_fails() {
        let temp = tempdir().unwrap();
        let _held = InstanceLock::acquire(temp.path()).unwrap();

        let second = InstanceLock::acquire(temp.path());
        assert!(matches!(second, Err(Error::AlreadyRunning { .. })));
    }

    #[test]
    fn test_reacquire_after_release() {
        let temp = tempdir().unwrap();

        {
            let _held = InstanceLock::acquire(temp.path()).unwrap();
        }

        assert!(InstanceLock::acquire(temp.path()).is_ok());
    }

    #[test]
    fn test_lock_file_carries_pid() {
        let temp = tempdir().unwrap();
        let lock = InstanceLock::acquire(temp.path()).unwrap();

        let content = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());
    }
}
