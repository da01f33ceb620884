pub mod archiver;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod mount;
pub mod privilege;
pub mod progress;
pub mod types;
pub mod util;

pub use config::model::{RunConfig, Settings};
pub use controller::{RunController, Step};
pub use error::{BorgbahmError, Result};
pub use types::RunResult;
