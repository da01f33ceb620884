//! The run state machine.
//!
//! ```text
//! PRIV_CHECK -> MOUNT -> REPO_INIT -> CONSISTENCY_CHECK -> BACKUP -> PRUNE -> UNMOUNT
//!                                                     \-> RESTORE --------/
//! ```
//!
//! Gated steps run in order and the first failure skips the rest. The
//! unmount is owned by a [`MountGuard`] created before the first step, so it
//! runs on every path. The first recorded failure decides the exit code; an
//! unmount failure only replaces a clean result.

use std::fmt;

use tracing::{debug, error};

use crate::archiver::{Archiver, RepositorySession};
use crate::config::model::RunConfig;
use crate::error::{ConfigError, Result};
use crate::mount::guard::MountGuard;
use crate::mount::ops::mount_device;
use crate::privilege::PrivilegeCheck;
use crate::progress::Progress;
use crate::types::RunResult;
use crate::util::command::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PrivilegeCheck,
    Mount,
    RepositoryInit,
    ConsistencyCheck,
    Backup,
    Prune,
    Restore,
    Unmount,
}

impl Step {
    pub fn failure(&self) -> RunResult {
        match self {
            Step::PrivilegeCheck => RunResult::NoPrivileges,
            Step::Mount => RunResult::MountFailed,
            Step::RepositoryInit => RunResult::EnvironmentFailed,
            Step::ConsistencyCheck => RunResult::ConsistencyFailed,
            Step::Backup => RunResult::BackupFailed,
            Step::Prune => RunResult::PruneFailed,
            Step::Restore => RunResult::RestoreFailed,
            Step::Unmount => RunResult::UnmountFailed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::PrivilegeCheck => "privilege-check",
            Step::Mount => "mount",
            Step::RepositoryInit => "repository-init",
            Step::ConsistencyCheck => "consistency-check",
            Step::Backup => "backup",
            Step::Prune => "prune",
            Step::Restore => "restore",
            Step::Unmount => "unmount",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Step::PrivilegeCheck => "this program requires super user privileges",
            Step::Mount => "the device could not be mounted",
            Step::RepositoryInit => {
                "the archiver environment could not be initialized; verify that borg is installed and the repository is created"
            }
            Step::ConsistencyCheck => {
                "the repository consistency check failed; creating a new repository is recommended"
            }
            Step::Backup => "the archiver failed to create the backup archive",
            Step::Prune => "the archiver failed to prune old backup archives",
            Step::Restore => "the archiver failed to restore the most recent backup archive",
            Step::Unmount => "the mountpoint could not be unmounted",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RunController<'a> {
    privileges: &'a dyn PrivilegeCheck,
    runner: &'a dyn CommandRunner,
    progress: Progress,
}

impl<'a> RunController<'a> {
    pub fn new(
        privileges: &'a dyn PrivilegeCheck,
        runner: &'a dyn CommandRunner,
        progress: Progress,
    ) -> Self {
        Self {
            privileges,
            runner,
            progress,
        }
    }

    pub fn run(&self, config: &RunConfig) -> RunResult {
        let guard = MountGuard::new(
            self.runner,
            config.device(),
            config.mount_dir(),
            config.settings.unmount_grace(),
        );

        let mut result = match self.run_gated(config) {
            Ok(()) => RunResult::Ok,
            Err(failed) => failed,
        };

        self.progress.line(format!(
            "Unmounting {} from directory {}.",
            config.device().display(),
            guard.mountpoint().display()
        ));
        if let Err(failed) = self.attempt(Step::Unmount, guard.release()) {
            if result.is_ok() {
                result = failed;
            }
        }
        debug!("run finished with exit code {}", result.exit_code());
        result
    }

    fn run_gated(&self, config: &RunConfig) -> std::result::Result<(), RunResult> {
        self.progress
            .line("Checking availability of super user privileges.");
        if !self.privileges.has_elevated_privileges() {
            let step = Step::PrivilegeCheck;
            error!(step = %step, "{}", step.failure_message());
            return Err(step.failure());
        }

        self.progress.line(format!(
            "Mounting {} to directory {}.",
            config.device().display(),
            config.mount_dir().display()
        ));
        self.attempt(
            Step::Mount,
            mount_device(self.runner, config.device(), config.mount_dir()),
        )?;

        self.progress.line("Initializing environment.");
        if let Some(fault) = &config.settings_fault {
            let unusable: Result<()> = Err(ConfigError::Unusable(fault.clone()).into());
            self.attempt(Step::RepositoryInit, unusable)?;
        }
        let session = RepositorySession::new(
            &config.settings.archiver,
            config.repository_url(),
            config.passphrase.clone(),
        );
        self.attempt(Step::RepositoryInit, session.verify())?;
        let archiver = Archiver::new(self.runner, &session, &config.settings);

        self.progress.line(format!(
            "Checking {} repository consistency.",
            session.url().display()
        ));
        self.attempt(Step::ConsistencyCheck, archiver.check_repository())?;

        if config.mode.restore {
            let restored = archiver.perform_restore(|name| {
                self.progress
                    .line(format!("Restoring the backup archive with name {}.", name))
            });
            self.attempt(Step::Restore, restored)?;
        } else {
            self.progress.line("Creating new backup archive.");
            self.attempt(Step::Backup, archiver.perform_backup())?;

            self.progress
                .line("Removing old backup archives that are no longer needed.");
            self.attempt(Step::Prune, archiver.perform_prune())?;
        }
        Ok(())
    }

    fn attempt<T>(&self, step: Step, outcome: Result<T>) -> std::result::Result<T, RunResult> {
        outcome.map_err(|err| {
            error!(step = %step, "{}: {}", step.failure_message(), err);
            step.failure()
        })
    }
}
