use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::util::command::CommandRunner;
use crate::util::paths::normalize_path;

/// Asks lsblk where `device` is mounted. Only the first reported mountpoint
/// counts; `None` when the device is not mounted or the query fails.
pub fn query_mountpoint(runner: &dyn CommandRunner, device: &Path) -> Option<PathBuf> {
    let mut cmd = Command::new("lsblk");
    cmd.arg("-o")
        .arg("MOUNTPOINT")
        .arg("-nr")
        .arg(normalize_path(device));
    let output = match runner.output(&mut cmd) {
        Ok(output) => output,
        Err(err) => {
            debug!("lsblk {}: {}", device.display(), err);
            return None;
        }
    };
    if output.code != 0 {
        debug!(
            "lsblk for device {} failed with exit code {}",
            device.display(),
            output.code
        );
        return None;
    }
    let first = output.stdout.trim().lines().next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(PathBuf::from(decode_lsblk_escapes(first)))
}

/// True iff `dir` exists and lsblk reports `device` mounted exactly there.
pub fn is_mounted(runner: &dyn CommandRunner, device: &Path, dir: &Path) -> bool {
    if !dir.is_dir() {
        debug!("the mountpoint {} does not exist", dir.display());
        return false;
    }
    match query_mountpoint(runner, device) {
        Some(mounted) => {
            debug!(
                "device {} reports to be mounted at {}",
                device.display(),
                mounted.display()
            );
            normalize_path(&mounted) == normalize_path(dir)
        }
        None => false,
    }
}

/// lsblk's raw output mode writes unsafe bytes as `\xHH`.
fn decode_lsblk_escapes(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() && bytes[i + 1] == b'x' {
            let hex = std::str::from_utf8(&bytes[i + 2..i + 4]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).to_string()
}
