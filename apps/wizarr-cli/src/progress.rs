//! Per-invitation progress on stderr
//!
//! A progress bar tracks the batch while `✓`/`✗` lines are printed above it.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use wizarr_client::{BatchProgress, BatchReport, CallOutcome};

use crate::output::{failure_line, success_line};

const BAR_TEMPLATE: &str = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}";

/// Progress reporter for a batch run
pub struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl CliProgress {
    /// Create a reporter; a quiet one prints nothing at all.
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
        };
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        Self { bar, quiet }
    }

    fn line(&self, text: String) {
        if !self.quiet {
            self.bar.suspend(|| eprintln!("{text}"));
        }
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

/// Text of the progress line for one outcome, without the status symbol.
pub fn outcome_message(outcome: &CallOutcome, count: usize) -> String {
    match outcome {
        CallOutcome::Success(success) => {
            format!("Created invitation {}/{}", success.index, count)
        }
        CallOutcome::Failure(failure) => format!(
            "Failed to create invitation {}/{}: {}",
            failure.index, count, failure.error
        ),
    }
}

impl BatchProgress for CliProgress {
    fn started(&self, count: usize) {
        self.line(format!("Creating {count} invitation(s)..."));
        self.bar.set_length(count as u64);
        self.bar.set_message("Creating invitations");
        if !self.quiet {
            self.bar.enable_steady_tick(Duration::from_millis(100));
        }
    }

    fn completed(&self, outcome: &CallOutcome, count: usize) {
        let message = outcome_message(outcome, count);
        let text = if outcome.is_success() {
            success_line(&message)
        } else {
            failure_line(&message)
        };
        self.line(text);
        self.bar.inc(1);
    }

    fn finished(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}
