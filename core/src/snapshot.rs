//! # Snapshots
//!
//! The trailing chain store is persisted with `borsh` after every submission.
//! Snapshots are written to a sibling temporary file first and renamed into
//! place, so a crash never leaves a half written store behind.
//!
//! A command holds a [`SnapshotLock`] from loading the snapshot until it saved
//! the result. The lock is a sibling `.lock` file created exclusively; a second
//! process finds it and gives up instead of overwriting the first one's work.

use crate::errors::OracleError;
use oracle_lib::TrailingChainStore;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn temporary_path(path: &Path) -> PathBuf {
    sibling_path(path, ".tmp")
}

pub fn lock_path(path: &Path) -> PathBuf {
    sibling_path(path, ".lock")
}

/// Exclusive hold on a snapshot across processes. Released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    path: PathBuf,
}

impl SnapshotLock {
    /// Creates the lock file next to `snapshot_path`, failing with
    /// [`OracleError::SnapshotLocked`] if it already exists.
    pub fn acquire(snapshot_path: &Path) -> Result<Self, OracleError> {
        let path = lock_path(snapshot_path);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(OracleError::SnapshotLocked(path))
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(file, "{}", std::process::id())?;

        tracing::debug!(path = ?path, "Snapshot lock acquired");
        Ok(SnapshotLock { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = ?self.path, "Failed to release snapshot lock: {e}");
        }
    }
}

pub fn save_snapshot(path: &Path, store: &TrailingChainStore) -> Result<(), OracleError> {
    let bytes = borsh::to_vec(store)?;
    let tmp = temporary_path(path);

    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(
        path = ?path,
        tip_height = store.tip_height(),
        "Snapshot saved"
    );
    Ok(())
}

/// Loads a snapshot and checks that the window it holds is consistent.
pub fn load_snapshot(path: &Path) -> Result<TrailingChainStore, OracleError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(OracleError::SnapshotNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let store: TrailingChainStore =
        borsh::from_slice(&bytes).map_err(|e| OracleError::SnapshotDecode(e.to_string()))?;
    store.check_consistency()?;

    Ok(store)
}
