use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{Passphrase, RunMode};
use crate::util::paths::normalize_path;

/// Optional settings file. Every key has a default, so an absent file and an
/// empty file behave the same.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_archiver")]
    pub archiver: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    #[serde(default = "default_true", rename = "excludeCaches")]
    pub exclude_caches: bool,
    #[serde(default)]
    pub keep: RetentionPolicy,
    #[serde(default = "default_grace", rename = "unmountGraceSecs")]
    pub unmount_grace_secs: u64,
    #[serde(default = "default_restore_root", rename = "restoreRoot")]
    pub restore_root: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RetentionPolicy {
    #[serde(default = "default_keep_daily")]
    pub daily: u32,
    #[serde(default = "default_keep_weekly")]
    pub weekly: u32,
    #[serde(default = "default_keep_monthly")]
    pub monthly: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            daily: default_keep_daily(),
            weekly: default_keep_weekly(),
            monthly: default_keep_monthly(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            archiver: default_archiver(),
            source: default_source(),
            compression: default_compression(),
            excludes: default_excludes(),
            exclude_caches: true,
            keep: RetentionPolicy::default(),
            unmount_grace_secs: default_grace(),
            restore_root: default_restore_root(),
        }
    }
}

impl Settings {
    pub fn unmount_grace(&self) -> Duration {
        Duration::from_secs(self.unmount_grace_secs)
    }
}

/// Everything one run needs, fixed before the first step executes.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub device: PathBuf,
    pub mount_dir: PathBuf,
    pub repository: String,
    pub passphrase: Passphrase,
    pub mode: RunMode,
    pub settings: Settings,
    /// Why the settings file was rejected. `settings` then holds the
    /// defaults, and the run fails when the archiver environment is set up.
    pub settings_fault: Option<String>,
}

impl RunConfig {
    /// Repository location on the mounted device.
    pub fn repository_url(&self) -> PathBuf {
        normalize_path(&self.mount_dir).join(&self.repository)
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn mount_dir(&self) -> &Path {
        &self.mount_dir
    }
}

fn default_archiver() -> String {
    "borg".to_string()
}

fn default_source() -> String {
    "/home".to_string()
}

fn default_compression() -> String {
    "lz4".to_string()
}

fn default_excludes() -> Vec<String> {
    vec!["/home/*/.cache/*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_grace() -> u64 {
    2
}

fn default_restore_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_keep_daily() -> u32 {
    7
}

fn default_keep_weekly() -> u32 {
    4
}

fn default_keep_monthly() -> u32 {
    6
}
