use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{BorgbahmError, Result};

/// Rebuilds `path` from its components, which drops trailing and repeated
/// separators and interior `.` entries. `..` is kept as-is.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Changes the process working directory until dropped.
pub struct ScopedCurrentDir {
    previous: PathBuf,
}

impl ScopedCurrentDir {
    pub fn enter(target: &Path) -> Result<Self> {
        let previous = env::current_dir()
            .map_err(|e| BorgbahmError::message(format!("read working directory: {}", e)))?;
        env::set_current_dir(target).map_err(|e| {
            BorgbahmError::message(format!("change directory to {}: {}", target.display(), e))
        })?;
        Ok(Self { previous })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedCurrentDir {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            warn!(
                "restore working directory {}: {}",
                self.previous.display(),
                err
            );
        }
    }
}

#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
