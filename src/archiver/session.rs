use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{ArchiverError, Result};
use crate::types::Passphrase;

pub const REPO_ENV: &str = "BORG_REPO";
pub const PASSPHRASE_ENV: &str = "BORG_PASSPHRASE";
pub const REPO_MARKER: &str = "config";

/// Repository location and passphrase shared by every archiver call of one
/// run. Bound once, read-only afterwards, and handed to each child process
/// through its own environment rather than ours.
#[derive(Debug, Clone)]
pub struct RepositorySession {
    program: String,
    url: PathBuf,
    passphrase: Passphrase,
}

impl RepositorySession {
    pub fn new(program: &str, url: PathBuf, passphrase: Passphrase) -> Self {
        Self {
            program: program.to_string(),
            url,
            passphrase,
        }
    }

    pub fn url(&self) -> &Path {
        &self.url
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Both checks always run so the debug log shows every problem at once.
    pub fn verify(&self) -> Result<()> {
        let located = which::which(&self.program);
        debug!(
            "archiver installation check for {}: {}",
            self.program,
            located.is_ok()
        );
        let marker = self.url.join(REPO_MARKER);
        let marker_present = marker.is_file();
        debug!(
            "repository marker {} present: {}",
            marker.display(),
            marker_present
        );
        if located.is_err() {
            return Err(ArchiverError::NotInstalled(self.program.clone()).into());
        }
        if !marker_present {
            return Err(ArchiverError::RepositoryMissing(self.url.clone()).into());
        }
        Ok(())
    }

    /// Starts an archiver invocation with the session bound in.
    pub fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(subcommand)
            .env(REPO_ENV, &self.url)
            .env(PASSPHRASE_ENV, self.passphrase.expose());
        cmd
    }
}
