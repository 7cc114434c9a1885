//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use wizarr_client::{AccessDuration, ExpiresInDays};

const AFTER_HELP: &str = "\
Examples:
  # Create 5 invitations (prints only URLs)
  wizarr --api-key YOUR_KEY --count 5 --server-ids 1 2

  # Detailed JSON output
  wizarr --api-key YOUR_KEY --count 10 --server-ids 1 --expires-in-days 7 \\
    --duration 30 --no-unlimited --allow-downloads --allow-live-tv --verbose

  # Parameters from a JSON config file
  wizarr --api-key YOUR_KEY --config config.json

  # Save URLs to a file
  wizarr --api-key YOUR_KEY --count 5 --server-ids 1 --output urls.txt";

/// Wizarr batch invitation creator
#[derive(Parser, Debug, Clone)]
#[command(name = "wizarr")]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Cli {
    /// API key for authentication
    #[arg(long, env = "WIZARR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Wizarr server [default: https://invite.rarbg.zip]
    #[arg(long, env = "WIZARR_BASE_URL")]
    pub base_url: Option<String>,

    /// Number of invitations to create (required without --config)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// JSON configuration file; command-line flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Server IDs the invitation grants access to
    #[arg(long, num_args = 1..)]
    pub server_ids: Option<Vec<i64>>,

    /// Days until the invitation expires (1, 7 or 30)
    #[arg(long, value_parser = parse_expires_in_days)]
    pub expires_in_days: Option<ExpiresInDays>,

    /// User access duration in days, or "unlimited"
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<AccessDuration>,

    /// Grant unlimited user access (default)
    #[arg(long, overrides_with = "no_unlimited")]
    pub unlimited: bool,

    /// Limit user access to --duration days
    #[arg(long, overrides_with = "unlimited")]
    pub no_unlimited: bool,

    /// Library IDs to grant access to
    #[arg(long, num_args = 1..)]
    pub library_ids: Option<Vec<i64>>,

    /// Allow user downloads
    #[arg(long)]
    pub allow_downloads: bool,

    /// Allow live TV access
    #[arg(long)]
    pub allow_live_tv: bool,

    /// Allow mobile uploads
    #[arg(long)]
    pub allow_mobile_uploads: bool,

    /// Stop at the first invitation that fails
    #[arg(long)]
    pub stop_on_error: bool,

    /// Write results to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Output the detailed JSON report instead of invitation URLs
    #[arg(long, short = 'v', visible_alias = "json")]
    pub verbose: bool,

    /// Validate settings and show the request without sending it (with --quiet, only validate)
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Retries per invitation for rate limits and server errors
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Log HTTP requests and retry decisions
    #[arg(long)]
    pub debug: bool,

    /// Log everything, including dependency internals
    #[arg(long)]
    pub trace: bool,
}

impl Cli {
    /// Explicit `--unlimited` / `--no-unlimited`, if either was given.
    pub fn unlimited_flag(&self) -> Option<bool> {
        if self.no_unlimited {
            Some(false)
        } else if self.unlimited {
            Some(true)
        } else {
            None
        }
    }
}

fn parse_expires_in_days(s: &str) -> Result<ExpiresInDays, String> {
    let days: u32 = s
        .parse()
        .map_err(|_| format!("{s:?} is not a number of days"))?;
    ExpiresInDays::try_from(days).map_err(|e| e.to_string())
}

fn parse_duration(s: &str) -> Result<AccessDuration, String> {
    s.parse().map_err(|e: wizarr_client::WizarrError| e.to_string())
}
