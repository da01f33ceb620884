use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BorgbahmError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Mount(MountError),
    #[error("{0}")]
    Archiver(ArchiverError),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
    #[error("settings unusable: {0}")]
    Unusable(String),
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("mountpoint {0} does not exist")]
    MountpointMissing(PathBuf),
    #[error("device {device} is not mounted at {dir}")]
    NotMounted { device: PathBuf, dir: PathBuf },
    #[error("umount {dir} failed with exit code {code}")]
    UmountFailure { dir: PathBuf, code: i32 },
}

#[derive(Debug, Error)]
pub enum ArchiverError {
    #[error("archiver {0} not found on PATH")]
    NotInstalled(String),
    #[error("no repository at {0} (missing config file)")]
    RepositoryMissing(PathBuf),
    #[error("{operation} failed with exit code {code}")]
    Status { operation: &'static str, code: i32 },
    #[error("no archive found in repository")]
    NoArchive,
}

pub type Result<T> = std::result::Result<T, BorgbahmError>;

impl BorgbahmError {
    pub fn message(msg: impl Into<String>) -> Self {
        BorgbahmError::Message(msg.into())
    }
}

impl From<MountError> for BorgbahmError {
    fn from(err: MountError) -> Self {
        BorgbahmError::Mount(err)
    }
}

impl From<ArchiverError> for BorgbahmError {
    fn from(err: ArchiverError) -> Self {
        BorgbahmError::Archiver(err)
    }
}

impl From<ConfigError> for BorgbahmError {
    fn from(err: ConfigError) -> Self {
        BorgbahmError::Config(err)
    }
}
