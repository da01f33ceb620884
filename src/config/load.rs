use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::model::{RunConfig, Settings};
use crate::error::{BorgbahmError, ConfigError, Result};
use crate::types::{Passphrase, RunMode};

pub const CONFIG_FILE: &str = "/etc/borgbahm.yaml";

pub fn load_settings(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BorgbahmError::message(format!("read config {}: {}", path.display(), e)))?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// An explicit path must exist; the system-wide file is optional.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        debug!("loading settings from {}", path.display());
        return load_settings(path);
    }
    let default = PathBuf::from(CONFIG_FILE);
    if default.is_file() {
        debug!("loading settings from {}", default.display());
        return load_settings(&default);
    }
    Ok(Settings::default())
}

/// Like [`resolve_settings`], but a bad file never stops the run from
/// starting: the defaults stand in and the error is handed back for the
/// controller to report at the right step.
pub fn resolve_settings_or_defaults(explicit: Option<&Path>) -> (Settings, Option<String>) {
    match resolve_settings(explicit) {
        Ok(settings) => (settings, None),
        Err(err) => {
            warn!("settings rejected: {}", err);
            (Settings::default(), Some(err.to_string()))
        }
    }
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.archiver.trim().is_empty() {
        return Err(ConfigError::Invalid("archiver is empty".to_string()).into());
    }
    if settings.source.trim().is_empty() {
        return Err(ConfigError::Invalid("source path is empty".to_string()).into());
    }
    if settings.compression.trim().is_empty() {
        return Err(ConfigError::Invalid("compression is empty".to_string()).into());
    }
    if !settings.restore_root.is_absolute() {
        return Err(ConfigError::Invalid(format!(
            "restoreRoot {} must be absolute",
            settings.restore_root.display()
        ))
        .into());
    }
    let keep = settings.keep;
    if keep.daily == 0 && keep.weekly == 0 && keep.monthly == 0 {
        return Err(ConfigError::Invalid(
            "keep must retain at least one daily, weekly or monthly archive".to_string(),
        )
        .into());
    }
    Ok(())
}

pub fn build_run_config(
    device: &str,
    mount_dir: &str,
    repository: &str,
    passphrase: &str,
    mode: RunMode,
    settings: Settings,
) -> Result<RunConfig> {
    if device.trim().is_empty() {
        return Err(ConfigError::Invalid("device is empty".to_string()).into());
    }
    if mount_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("mount directory is empty".to_string()).into());
    }
    if repository.trim().is_empty() {
        return Err(ConfigError::Invalid("repository name is empty".to_string()).into());
    }
    Ok(RunConfig {
        device: PathBuf::from(device),
        mount_dir: PathBuf::from(mount_dir),
        repository: repository.to_string(),
        passphrase: Passphrase::new(passphrase),
        mode,
        settings,
        settings_fault: None,
    })
}
