use tracing::debug;

use crate::archiver::{Archiver, ARCHIVE_NAME_TEMPLATE, ARCHIVE_PREFIX};
use crate::config::model::{RetentionPolicy, Settings};
use crate::error::{ArchiverError, Result};
use crate::util::command::archiver_accepts;

impl Archiver<'_> {
    /// Creates a new `{hostname}-{timestamp}` archive of the source tree.
    pub fn perform_backup(&self) -> Result<()> {
        let mut cmd = self.session.command("create");
        cmd.args(create_args(self.settings));
        let code = self.runner.status(&mut cmd)?;
        debug!("archiver create command returned {}", code);
        if !archiver_accepts(code) {
            return Err(ArchiverError::Status {
                operation: "create",
                code,
            }
            .into());
        }
        Ok(())
    }

    /// Thins out this host's archives according to the retention policy.
    pub fn perform_prune(&self) -> Result<()> {
        let mut cmd = self.session.command("prune");
        cmd.args(prune_args(&self.settings.keep));
        let code = self.runner.status(&mut cmd)?;
        debug!("archiver prune command returned {}", code);
        if !archiver_accepts(code) {
            return Err(ArchiverError::Status {
                operation: "prune",
                code,
            }
            .into());
        }
        Ok(())
    }
}

fn create_args(settings: &Settings) -> Vec<String> {
    let mut args = vec![
        "--verbose".to_string(),
        "--stats".to_string(),
        "--compression".to_string(),
        settings.compression.clone(),
    ];
    if settings.exclude_caches {
        args.push("--exclude-caches".to_string());
    }
    for exclude in &settings.excludes {
        args.push("--exclude".to_string());
        args.push(exclude.clone());
    }
    args.push(format!("::{}", ARCHIVE_NAME_TEMPLATE));
    args.push(settings.source.clone());
    args
}

fn prune_args(keep: &RetentionPolicy) -> Vec<String> {
    vec![
        "--verbose".to_string(),
        "--list".to_string(),
        "--prefix".to_string(),
        ARCHIVE_PREFIX.to_string(),
        "--keep-daily".to_string(),
        keep.daily.to_string(),
        "--keep-weekly".to_string(),
        keep.weekly.to_string(),
        "--keep-monthly".to_string(),
        keep.monthly.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archiver::RepositorySession;
    use crate::types::Passphrase;
    use crate::util::command::SystemRunner;
    use crate::util::testing::{scripted_archiver, RecordingRunner};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn session() -> RepositorySession {
        RepositorySession::new("borg", PathBuf::from("/mnt/t/r"), Passphrase::new("p"))
    }

    #[test]
    fn create_excludes_caches_and_names_archive_by_host() {
        let args = create_args(&Settings::default());
        assert_eq!(
            args,
            vec![
                "--verbose",
                "--stats",
                "--compression",
                "lz4",
                "--exclude-caches",
                "--exclude",
                "/home/*/.cache/*",
                "::{hostname}-{now:%Y-%m-%dT%H:%M:%S}",
                "/home",
            ]
        );
    }

    #[test]
    fn prune_keeps_7_daily_4_weekly_6_monthly() {
        let args = prune_args(&RetentionPolicy::default());
        assert_eq!(
            args,
            vec![
                "--verbose",
                "--list",
                "--prefix",
                "{hostname}-",
                "--keep-daily",
                "7",
                "--keep-weekly",
                "4",
                "--keep-monthly",
                "6",
            ]
        );
    }

    #[test]
    fn backup_tolerates_warnings_only() {
        let session = session();
        let settings = Settings::default();
        let runner = RecordingRunner::new().with_code("create", 1);
        Archiver::new(&runner, &session, &settings)
            .perform_backup()
            .expect("warning is success");
        let runner = RecordingRunner::new().with_code("create", 2);
        assert!(Archiver::new(&runner, &session, &settings)
            .perform_backup()
            .is_err());
    }

    #[test]
    fn prune_fails_on_error_status() {
        let session = session();
        let settings = Settings::default();
        let runner = RecordingRunner::new().with_code("prune", 1);
        Archiver::new(&runner, &session, &settings)
            .perform_prune()
            .expect("warning is success");
        let runner = RecordingRunner::new().with_code("prune", 2);
        assert!(Archiver::new(&runner, &session, &settings)
            .perform_prune()
            .is_err());
    }

    #[test]
    fn killed_archiver_fails_backup_and_prune() {
        let bin_dir = TempDir::new().expect("tempdir");
        let borg = scripted_archiver(bin_dir.path(), "kill -9 $$");
        let session = RepositorySession::new(
            &borg.to_string_lossy(),
            PathBuf::from("/mnt/t/r"),
            Passphrase::new("p"),
        );
        let settings = Settings::default();
        let archiver = Archiver::new(&SystemRunner, &session, &settings);
        assert!(matches!(
            archiver.perform_backup(),
            Err(crate::error::BorgbahmError::Archiver(ArchiverError::Status {
                operation: "create",
                code: 137,
            }))
        ));
        assert!(archiver.perform_prune().is_err());
    }
}
