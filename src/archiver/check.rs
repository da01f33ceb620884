use tracing::debug;

use crate::archiver::Archiver;
use crate::error::{ArchiverError, Result};

impl Archiver<'_> {
    /// Repository-only integrity check. Unlike every other archiver call, a
    /// warning status fails here.
    pub fn check_repository(&self) -> Result<()> {
        let mut cmd = self.session.command("check");
        cmd.arg("--repository-only");
        let output = self.runner.output(&mut cmd)?;
        debug!("archiver check command returned {}", output.code);
        if output.code != 0 {
            if !output.stderr.trim().is_empty() {
                debug!("check: {}", output.stderr.trim());
            }
            return Err(ArchiverError::Status {
                operation: "check",
                code: output.code,
            }
            .into());
        }
        Ok(())
    }
}
