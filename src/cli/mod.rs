use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::args::Cli;
use crate::config::load::{build_run_config, resolve_settings_or_defaults};
use crate::controller::RunController;
use crate::privilege::EffectiveUser;
use crate::progress::Progress;
use crate::types::{RunMode, RunResult};
use crate::util::command::SystemRunner;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LICENSE_NAME: &str = "GNU GPL v3 or later";

/// Exit code for arguments rejected before the run starts, as clap uses for
/// its own usage errors.
pub const EXIT_USAGE: i32 = 2;

pub mod args;

pub fn run() -> Result<RunResult> {
    let cli = parse_cli();
    init_tracing(cli.debug);
    debug!("borgbahm {}", VERSION);

    let (settings, settings_fault) = resolve_settings_or_defaults(cli.config.as_deref());
    let mode = RunMode {
        restore: cli.restore,
        quiet: cli.quiet,
        debug: cli.debug,
    };
    let mut config = build_run_config(
        &cli.device,
        &cli.mountdir,
        &cli.reponame,
        &cli.passphrase,
        mode,
        settings,
    )
    .context("invalid arguments")?;
    config.settings_fault = settings_fault;
    debug!(
        device = %config.device().display(),
        mount_dir = %config.mount_dir().display(),
        repository = %config.repository_url().display(),
        restore = mode.restore,
        "run configuration"
    );

    let privileges = EffectiveUser;
    let runner = SystemRunner;
    let controller = RunController::new(&privileges, &runner, Progress::new(mode.quiet));
    Ok(controller.run(&config))
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.kind() == ErrorKind::DisplayVersion {
                print_banner();
                std::process::exit(0);
            }
            // clap prints help to stdout (exit 0) and usage errors to stderr (exit 2)
            err.exit()
        }
    }
}

fn print_banner() {
    println!("borgbahm {}", VERSION);
    println!("License: {}", LICENSE_NAME);
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
