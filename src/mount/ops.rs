use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::{MountError, Result};
use crate::mount::inspect::is_mounted;
use crate::util::command::CommandRunner;
use crate::util::paths::normalize_path;

/// Mounts `device` at `dir`. The exit code of `mount` is logged but not
/// trusted; only a follow-up lsblk query showing the binding counts.
pub fn mount_device(runner: &dyn CommandRunner, device: &Path, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(MountError::MountpointMissing(dir.to_path_buf()).into());
    }
    let mut cmd = Command::new("mount");
    cmd.arg(normalize_path(device)).arg(dir);
    let output = runner.output(&mut cmd)?;
    debug!(
        "mount command for device {} to directory {} returned {}",
        device.display(),
        dir.display(),
        output.code
    );
    if !output.stderr.trim().is_empty() {
        debug!("mount: {}", output.stderr.trim());
    }
    if !is_mounted(runner, device, dir) {
        return Err(MountError::NotMounted {
            device: device.to_path_buf(),
            dir: dir.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Unmounts `dir` if `device` is mounted there. Already unmounted is a no-op
/// success; a missing directory is a failure. `grace` lets in-flight I/O
/// settle before `umount` runs.
pub fn unmount_device(
    runner: &dyn CommandRunner,
    device: &Path,
    dir: &Path,
    grace: Duration,
) -> Result<()> {
    if !dir.is_dir() {
        return Err(MountError::MountpointMissing(dir.to_path_buf()).into());
    }
    if !is_mounted(runner, device, dir) {
        debug!(
            "device {} is not mounted at {}; nothing to unmount",
            device.display(),
            dir.display()
        );
        return Ok(());
    }
    if !grace.is_zero() {
        thread::sleep(grace);
    }
    let mut cmd = Command::new("umount");
    cmd.arg(dir);
    let output = runner.output(&mut cmd)?;
    debug!(
        "unmount command for directory {} returned {}",
        dir.display(),
        output.code
    );
    if output.code != 0 {
        if !output.stderr.trim().is_empty() {
            debug!("umount: {}", output.stderr.trim());
        }
        return Err(MountError::UmountFailure {
            dir: dir.to_path_buf(),
            code: output.code,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BorgbahmError;
    use crate::util::testing::RecordingRunner;
    use tempfile::TempDir;

    const DEVICE: &str = "/dev/sdz";

    #[test]
    fn mount_verified_by_query() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new();
        mount_device(&runner, Path::new(DEVICE), dir.path()).expect("mount");
        assert_eq!(runner.actions(), vec!["mount"]);
        let call = runner.find("mount").expect("mount call");
        assert_eq!(call.args, vec![DEVICE.to_string(), dir.path().display().to_string()]);
    }

    #[test]
    fn mount_fails_when_binding_missing_despite_zero_exit() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new().without_mount_binding();
        let err = mount_device(&runner, Path::new(DEVICE), dir.path()).unwrap_err();
        assert!(matches!(err, BorgbahmError::Mount(MountError::NotMounted { .. })));
    }

    #[test]
    fn mount_succeeds_when_bound_despite_nonzero_exit() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new()
            .already_mounted(dir.path())
            .with_code("mount", 32);
        mount_device(&runner, Path::new(DEVICE), dir.path()).expect("mount");
    }

    #[test]
    fn mount_requires_existing_dir() {
        let runner = RecordingRunner::new();
        let err = mount_device(&runner, Path::new(DEVICE), Path::new("/nonexistent/mnt"))
            .unwrap_err();
        assert!(matches!(err, BorgbahmError::Mount(MountError::MountpointMissing(_))));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn unmount_is_noop_when_not_mounted() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new();
        unmount_device(&runner, Path::new(DEVICE), dir.path(), Duration::ZERO).expect("unmount");
        assert!(runner.find("umount").is_none());
    }

    #[test]
    fn unmount_runs_umount_when_mounted() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new().already_mounted(dir.path());
        unmount_device(&runner, Path::new(DEVICE), dir.path(), Duration::ZERO).expect("unmount");
        let call = runner.find("umount").expect("umount call");
        assert_eq!(call.args, vec![dir.path().display().to_string()]);
        assert!(!runner.is_mounted());
    }

    #[test]
    fn unmount_failure_reports_code() {
        let dir = TempDir::new().expect("tempdir");
        let runner = RecordingRunner::new()
            .already_mounted(dir.path())
            .with_code("umount", 32);
        let err = unmount_device(&runner, Path::new(DEVICE), dir.path(), Duration::ZERO)
            .unwrap_err();
        assert!(matches!(
            err,
            BorgbahmError::Mount(MountError::UmountFailure { code: 32, .. })
        ));
    }

    #[test]
    fn unmount_missing_dir_fails() {
        let runner = RecordingRunner::new();
        assert!(unmount_device(
            &runner,
            Path::new(DEVICE),
            Path::new("/nonexistent/mnt"),
            Duration::ZERO
        )
        .is_err());
        assert!(runner.calls().is_empty());
    }
}
