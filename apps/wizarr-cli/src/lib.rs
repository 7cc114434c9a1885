//! Wizarr batch invitation CLI
//!
//! Library half of the `wizarr` binary, exposed so the whole command can be
//! driven from tests.

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod settings;

pub use app::{execute, report_exit_code};
pub use cli::Cli;
pub use error::{CliError, CliResult};
