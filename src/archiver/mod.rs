//! Invocations of the external deduplicating archiver (borg).
//!
//! Every call goes through [`RepositorySession::command`], so the repository
//! and passphrase reach the child process without touching our own
//! environment. Exit status 0 is clean and 1 means "finished with warnings";
//! the repository check is the one place where a warning is not good enough.

pub mod backup;
pub mod check;
pub mod list;
pub mod restore;
pub mod session;

use crate::config::model::Settings;
use crate::util::command::CommandRunner;

pub use session::RepositorySession;

/// Archive names carry the host so several machines can share a repository.
pub const ARCHIVE_PREFIX: &str = "{hostname}-";
pub const ARCHIVE_NAME_TEMPLATE: &str = "{hostname}-{now:%Y-%m-%dT%H:%M:%S}";

pub struct Archiver<'a> {
    runner: &'a dyn CommandRunner,
    session: &'a RepositorySession,
    settings: &'a Settings,
}

impl<'a> Archiver<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        session: &'a RepositorySession,
        settings: &'a Settings,
    ) -> Self {
        Self {
            runner,
            session,
            settings,
        }
    }
}
