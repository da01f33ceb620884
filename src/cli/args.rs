use std::path::PathBuf;

use clap::Parser;

const ABOUT: &str = "Manage backups of the /home directory with borg. Run this program on a daily \
basis to create incremental backups. It automatically maintains 7 daily, 4 weekly and 6 monthly \
backup archives.";

const EXAMPLES: &str = "\
Example for creating a new backup archive:
    sudo borgbahm /dev/sdc /mnt/backup borgrepo Pa55w0rd

Example for restoring from the most recent backup archive:
    sudo borgbahm --restore /dev/sdc /mnt/backup borgrepo Pa55w0rd

It is assumed that the mountdir exists and that the borg repository on the device
is initialized. To initialize a borg repository use:
    sudo borg init --encryption=repokey /mnt/backup/borgrepo";

#[derive(Parser, Debug)]
#[command(name = "borgbahm", version, about = ABOUT, after_help = EXAMPLES)]
pub struct Cli {
    /// Device name of the backup drive partition, e.g. /dev/sdc
    #[arg(value_parser = non_empty)]
    pub device: String,
    /// Directory for mounting the device, e.g. /mnt/backup
    #[arg(value_parser = non_empty)]
    pub mountdir: String,
    /// Name of the borg repository on the device, e.g. borgrepo
    #[arg(value_parser = non_empty)]
    pub reponame: String,
    /// Passphrase to access the borg repository
    pub passphrase: String,

    /// Enable debug messages
    #[arg(short, long)]
    pub debug: bool,
    /// Restore from the most recent archive instead of backing up
    #[arg(short, long)]
    pub restore: bool,
    /// Quiet mode: no progress lines
    #[arg(short, long)]
    pub quiet: bool,
    /// Settings file (default /etc/borgbahm.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(value.to_string())
}
