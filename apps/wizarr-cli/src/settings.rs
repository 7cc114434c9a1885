//! Run settings: JSON config file merged with command-line flags.
//!
//! Precedence, highest first: command-line flags (and their environment
//! variables), the `--config` file, built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;
use wizarr_client::{
    AccessDuration, ClientConfig, ExpiresInDays, InvitationRequest, RetryPolicy,
    DEFAULT_BASE_URL,
};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// `duration` in a config file may be written as `"unlimited"`, `"30"` or `30`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Days(u32),
    Text(String),
}

impl DurationValue {
    fn resolve(&self) -> CliResult<AccessDuration> {
        let parsed: Result<AccessDuration, _> = match self {
            DurationValue::Days(days) => days.to_string().parse(),
            DurationValue::Text(text) => text.parse(),
        };
        parsed.map_err(CliError::from)
    }
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    pub count: Option<usize>,
    pub server_ids: Option<Vec<i64>>,
    pub expires_in_days: Option<u32>,
    pub duration: Option<DurationValue>,
    pub unlimited: Option<bool>,
    pub library_ids: Option<Vec<i64>>,
    pub allow_downloads: Option<bool>,
    pub allow_live_tv: Option<bool>,
    pub allow_mobile_uploads: Option<bool>,
    pub base_url: Option<String>,
    pub stop_on_error: Option<bool>,
}

impl FileConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| CliError::ConfigFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Where and how the report is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
    pub quiet: bool,
}

/// Everything one run needs, resolved once and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub request: InvitationRequest,
    pub count: usize,
    pub stop_on_error: bool,
    pub dry_run: bool,
    pub output: OutputSettings,
}

impl Settings {
    /// Merge flags over the optional config file and validate the result.
    pub fn resolve(cli: &Cli, file: Option<FileConfig>) -> CliResult<Self> {
        let from_file = file.is_some();
        let file = file.unwrap_or_default();

        let count = match cli.count.or(file.count) {
            Some(count) => count,
            None if from_file => 1,
            None => {
                return Err(CliError::Config(
                    "--count is required when --config is not used".to_string(),
                ))
            }
        };
        if count < 1 {
            return Err(CliError::Validation(
                "count must be at least 1".to_string(),
            ));
        }

        let server_ids = cli
            .server_ids
            .clone()
            .or(file.server_ids)
            .filter(|ids| !ids.is_empty())
            .ok_or_else(|| CliError::Config("--server-ids is required".to_string()))?;

        let expires_in_days = match (cli.expires_in_days, file.expires_in_days) {
            (Some(expires), _) => Some(expires),
            (None, Some(days)) => Some(ExpiresInDays::try_from(days)?),
            (None, None) => None,
        };

        let duration = match (cli.duration, file.duration.as_ref()) {
            (Some(duration), _) => duration,
            (None, Some(value)) => value.resolve()?,
            (None, None) => AccessDuration::Unlimited,
        };

        let unlimited = cli.unlimited_flag().or(file.unlimited).unwrap_or(true);
        if unlimited && !duration.is_unlimited() {
            warn!(
                duration = %duration,
                "Access is unlimited; pass --no-unlimited for the duration to apply"
            );
        }

        let request = InvitationRequest::new(server_ids)
            .with_expires_in_days(expires_in_days)
            .with_duration(duration, unlimited)
            .with_library_ids(cli.library_ids.clone().or(file.library_ids))
            .with_permissions(
                cli.allow_downloads || file.allow_downloads.unwrap_or(false),
                cli.allow_live_tv || file.allow_live_tv.unwrap_or(false),
                cli.allow_mobile_uploads || file.allow_mobile_uploads.unwrap_or(false),
            );
        request.validate()?;

        let client = client_config(cli, file.base_url.as_deref())?;

        Ok(Self {
            client,
            request,
            count,
            stop_on_error: cli.stop_on_error || file.stop_on_error.unwrap_or(false),
            dry_run: cli.dry_run,
            output: OutputSettings {
                format: if cli.verbose {
                    OutputFormat::Json
                } else {
                    OutputFormat::Urls
                },
                path: cli.output.clone(),
                quiet: cli.quiet,
            },
        })
    }

    /// Load `cli.config` if given, then resolve.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
        Self::resolve(cli, file)
    }
}

fn client_config(cli: &Cli, file_base_url: Option<&str>) -> CliResult<ClientConfig> {
    let base_url = cli
        .base_url
        .as_deref()
        .or(file_base_url)
        .unwrap_or(DEFAULT_BASE_URL);

    let api_key = match cli.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key.to_string(),
        // A dry run never contacts the server.
        _ if cli.dry_run => "dry-run".to_string(),
        _ => {
            return Err(CliError::Config(
                "an API key is required (--api-key or WIZARR_API_KEY)".to_string(),
            ))
        }
    };

    if cli.timeout == 0 {
        return Err(CliError::Validation(
            "--timeout must be at least 1 second".to_string(),
        ));
    }

    let retry = RetryPolicy {
        max_retries: cli.max_retries,
        ..RetryPolicy::default()
    };

    Ok(ClientConfig::new(base_url, api_key)?
        .with_timeout(cli.timeout)
        .with_retry(retry))
}
