use tracing::debug;

use crate::archiver::{Archiver, ARCHIVE_PREFIX};
use crate::types::ArchiveName;
use crate::util::command::archiver_accepts;

impl Archiver<'_> {
    /// Name of this host's newest archive, or `None` if the listing fails or
    /// holds nothing usable.
    ///
    /// Parses the plain listing instead of asking for `--last 1` so older
    /// archiver releases work too.
    pub fn most_recent_archive_name(&self) -> Option<ArchiveName> {
        let mut cmd = self.session.command("list");
        cmd.arg("--verbose").arg("--prefix").arg(ARCHIVE_PREFIX);
        let output = match self.runner.output(&mut cmd) {
            Ok(output) => output,
            Err(err) => {
                debug!("archiver list: {}", err);
                return None;
            }
        };
        debug!("archiver list command returned {}", output.code);
        if !archiver_accepts(output.code) {
            return None;
        }
        let name = parse_most_recent(&output.stdout);
        if let Some(name) = &name {
            debug!("most recent archive {}", name);
        }
        name
    }
}

/// Listings are oldest first: the newest archive is the first field of the
/// last non-blank line.
pub fn parse_most_recent(listing: &str) -> Option<ArchiveName> {
    let line = listing.lines().rev().find(|line| !line.trim().is_empty())?;
    let token = line.split_whitespace().next()?;
    token.parse().ok()
}
