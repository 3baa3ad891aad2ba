//! Atomic file writes
//!
//! Readers never observe a half-written file: content goes to a hidden
//! temporary file in the target's directory, is synced, then renamed over the
//! target.

use cellar_core::{Error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Temporary sibling file, removed on drop unless it was persisted
struct PendingFile {
    path: PathBuf,
    persisted: bool,
}

impl PendingFile {
    fn create_beside(target: &Path, parent: &Path) -> Self {
        let stem = target
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("cellar");
        Self {
            path: parent.join(format!(".{stem}.{}.tmp", Uuid::new_v4())),
            persisted: false,
        }
    }

    fn write(&self, content: &[u8]) -> Result<()> {
        let mut file = File::create(&self.path)
            .map_err(|e| Error::file_system(&self.path, "create temporary file", e))?;
        file.write_all(content)
            .map_err(|e| Error::file_system(&self.path, "write temporary file", e))?;
        file.sync_all()
            .map_err(|e| Error::file_system(&self.path, "sync temporary file", e))
    }

    fn persist(mut self, target: &Path) -> Result<()> {
        fs::rename(&self.path, target)
            .map_err(|e| Error::file_system(target, "atomic rename", e))?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Write data to a file atomically, creating parent directories as needed
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| {
            Error::configuration(format!("'{}' has no parent directory", path.display()))
        })?;

    fs::create_dir_all(parent)
        .map_err(|e| Error::file_system(parent, "create parent directory", e))?;

    let pending = PendingFile::create_beside(path, parent);
    pending.write(content)?;
    pending.persist(path)
}

/// Write string content to a file atomically
pub fn write_atomic_string(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
