use tracing::debug;

use crate::archiver::Archiver;
use crate::error::{ArchiverError, Result};
use crate::types::ArchiveName;
use crate::util::command::archiver_accepts;
use crate::util::paths::ScopedCurrentDir;

impl Archiver<'_> {
    /// Extracts this host's newest archive over the restore root.
    ///
    /// `on_resolved` sees the archive name before extraction starts.
    pub fn perform_restore(&self, on_resolved: impl FnOnce(&ArchiveName)) -> Result<ArchiveName> {
        let name = self
            .most_recent_archive_name()
            .ok_or(ArchiverError::NoArchive)?;
        debug!("most recent backup archive: {}", name);
        on_resolved(&name);
        self.restore_archive(&name)?;
        Ok(name)
    }

    /// Archives hold paths relative to `/` (the source was `/home`), so the
    /// extraction runs from the restore root. The previous working directory
    /// comes back on every path out of here.
    pub fn restore_archive(&self, name: &ArchiveName) -> Result<()> {
        let _cwd = ScopedCurrentDir::enter(&self.settings.restore_root)?;
        let mut cmd = self.session.command("extract");
        cmd.arg("--verbose").arg("--list").arg(format!("::{}", name));
        let code = self.runner.status(&mut cmd)?;
        debug!("archiver extract command returned {}", code);
        if !archiver_accepts(code) {
            return Err(ArchiverError::Status {
                operation: "extract",
                code,
            }
            .into());
        }
        Ok(())
    }
}
