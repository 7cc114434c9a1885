//! One CLI run: resolve settings, create the batch, write the report.

use std::sync::atomic::Ordering;

use tracing::{debug, info};
use wizarr_client::{BatchInvoker, BatchOptions, BatchReport, HttpTransport};

use crate::cli::Cli;
use crate::error::{CliResult, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::output::{print_info, print_warning, write_report};
use crate::progress::CliProgress;
use crate::settings::Settings;

/// Run the command and return the batch report.
///
/// Per-invitation failures are part of the report, not an `Err`.
pub async fn execute(cli: Cli) -> CliResult<BatchReport> {
    let settings = Settings::from_cli(&cli)?;
    debug!(client = ?settings.client, count = settings.count, "Settings resolved");

    if settings.dry_run {
        return dry_run(&settings);
    }

    let retry = settings.client.retry.clone();
    let transport = HttpTransport::new(settings.client.clone())?;
    let invoker = BatchInvoker::new(transport, retry);

    let interrupted = invoker.interrupt_flag();
    // Only the first handler in a process is installed.
    let _ = ctrlc::set_handler(move || {
        interrupted.store(true, Ordering::SeqCst);
    });

    let progress = CliProgress::new(settings.output.quiet);
    let options = BatchOptions::new(settings.count).stop_on_error(settings.stop_on_error);
    let report = invoker
        .run_batch(&settings.request, options, &progress)
        .await?;

    write_report(&report, &settings.output)?;

    if !settings.output.quiet {
        if report.interrupted {
            print_warning(&format!(
                "Interrupted after {} of {} invitation(s)",
                report.total, settings.count
            ));
        }
        if report.has_failures() {
            print_warning(&format!(
                "{} of {} invitation(s) failed",
                report.failed, report.total
            ));
        }
    }

    info!(
        successful = report.successful,
        failed = report.failed,
        "Run complete"
    );
    Ok(report)
}

fn dry_run(settings: &Settings) -> CliResult<BatchReport> {
    if let Some(preview) = dry_run_preview(settings)? {
        print_info(&preview);
    }
    Ok(BatchReport::new())
}

/// Target and request body shown by `--dry-run`; `None` under `--quiet`.
fn dry_run_preview(settings: &Settings) -> CliResult<Option<String>> {
    if settings.output.quiet {
        return Ok(None);
    }
    let body = serde_json::to_string_pretty(&settings.request)?;
    Ok(Some(format!(
        "Dry run: would send {} request(s) to POST {}\n{}",
        settings.count,
        settings.client.invitations_url(),
        body
    )))
}

/// Process exit code for a finished run.
pub fn report_exit_code(report: &BatchReport) -> i32 {
    if report.failed > 0 {
        EXIT_FAILURE
    } else if report.interrupted {
        EXIT_INTERRUPTED
    } else {
        EXIT_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use wizarr_client::CallOutcome;

    #[test]
    fn test_exit_code_all_succeeded() {
        let mut report = BatchReport::new();
        report.record(CallOutcome::success(1, json!({})));
        assert_eq!(report_exit_code(&report), 0);
    }

    #[test]
    fn test_exit_code_with_failures() {
        let mut report = BatchReport::new();
        report.record(CallOutcome::success(1, json!({})));
        report.record(CallOutcome::failure(2, "HTTP 500"));
        assert_eq!(report_exit_code(&report), 1);
    }

    #[test]
    fn test_exit_code_interrupted() {
        let mut report = BatchReport::new();
        report.record(CallOutcome::success(1, json!({})));
        report.set_interrupted();
        assert_eq!(report_exit_code(&report), 130);

        report.record(CallOutcome::failure(2, "HTTP 500"));
        assert_eq!(report_exit_code(&report), 1);
    }

    fn dry_run_settings(extra: &[&str]) -> Settings {
        let mut args = vec![
            "wizarr",
            "--base-url",
            "https://wizarr.test",
            "--count",
            "2",
            "--server-ids",
            "1",
            "--dry-run",
        ];
        args.extend_from_slice(extra);
        Settings::from_cli(&Cli::try_parse_from(args).unwrap()).unwrap()
    }

    #[test]
    fn test_dry_run_preview_shows_target_and_body() {
        let preview = dry_run_preview(&dry_run_settings(&[])).unwrap().unwrap();
        assert!(preview
            .starts_with("Dry run: would send 2 request(s) to POST https://wizarr.test/api/invitations"));
        assert!(preview.contains("\"server_ids\""));
    }

    #[test]
    fn test_dry_run_preview_silent_when_quiet() {
        let preview = dry_run_preview(&dry_run_settings(&["--quiet"])).unwrap();
        assert!(preview.is_none());
    }

    #[test]
    fn test_empty_report_is_success() {
        assert_eq!(report_exit_code(&BatchReport::new()), 0);
    }
}
