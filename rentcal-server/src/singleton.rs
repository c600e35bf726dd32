//! Keeps a single rentcal-server per database, so two scheduled syncs
//! never run against the same bookings.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

fn lock_path(database_path: &Path) -> Result<PathBuf> {
    if let Some(dir) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(database_path.with_extension("lock"))
}

/// Acquire an exclusive lock, failing if another instance uses the same database
pub fn acquire_lock(database_path: &Path) -> Result<LockGuard> {
    let path = lock_path(database_path)?;
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another rentcal-server instance is already using this database.\n\
            If you believe this is an error, remove: {}",
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lock_on_same_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("rentcal.db");

        let _guard = acquire_lock(&db).unwrap();
        assert!(acquire_lock(&db).is_err());
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("rentcal.db");

        drop(acquire_lock(&db).unwrap());
        assert!(acquire_lock(&db).is_ok());
    }
}
