use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::warn;

use crate::error::Result;
use crate::mount::ops::unmount_device;
use crate::util::command::CommandRunner;

/// Owns the obligation to unmount `device` from `dir` once the run is over.
///
/// Created before anything touches the device so every exit path reaches
/// the unmount. Call `release` to get the outcome; a guard dropped without
/// release (a panic unwinding through the run) still unmounts, best effort.
pub struct MountGuard<'a> {
    runner: &'a dyn CommandRunner,
    device: PathBuf,
    mountpoint: PathBuf,
    grace: Duration,
    released: bool,
}

impl<'a> MountGuard<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        device: &Path,
        mountpoint: &Path,
        grace: Duration,
    ) -> Self {
        Self {
            runner,
            device: device.to_path_buf(),
            mountpoint: mountpoint.to_path_buf(),
            grace,
            released: false,
        }
    }

    pub fn mountpoint(&self) -> &Path {
        &self.mountpoint
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        unmount_device(self.runner, &self.device, &self.mountpoint, self.grace)
    }
}

impl Drop for MountGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = unmount_device(self.runner, &self.device, &self.mountpoint, self.grace) {
            warn!("unmount {}: {}", self.mountpoint.display(), err);
        }
    }
}
