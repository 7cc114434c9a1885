//! CLI error types and exit codes

use thiserror::Error;
use wizarr_client::WizarrError;

pub type CliResult<T> = Result<T, CliError>;

/// Every invitation created
pub const EXIT_SUCCESS: i32 = 0;
/// One or more invitations failed, or an I/O error
pub const EXIT_FAILURE: i32 = 1;
/// Invalid configuration or arguments
pub const EXIT_CONFIG: i32 = 2;
/// Interrupted by Ctrl+C with no failures
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not read config file {path}: {message}")]
    ConfigFile { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Client(WizarrError),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Validation(_) | CliError::ConfigFile { .. } => {
                EXIT_CONFIG
            }
            CliError::Client(WizarrError::InvalidConfig(_)) => EXIT_CONFIG,
            CliError::Io(_) | CliError::Client(_) => EXIT_FAILURE,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(msg) if msg.contains("API key") => {
                Some("Pass --api-key or set WIZARR_API_KEY.")
            }
            CliError::Config(msg) if msg.contains("--count") => {
                Some("Pass --count or supply a config file with --config.")
            }
            CliError::ConfigFile { .. } => Some("Check that the file exists and is valid JSON."),
            _ => None,
        }
    }
}

impl From<WizarrError> for CliError {
    fn from(e: WizarrError) -> Self {
        match e {
            WizarrError::InvalidConfig(msg) => CliError::Config(msg),
            other => CliError::Client(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {}", e))
    }
}
