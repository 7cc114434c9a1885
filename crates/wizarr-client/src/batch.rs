//! Sequential batch creation of invitations.
//!
//! Every index is attempted once through [`RetryPolicy::execute`], so transient
//! failures are absorbed there and only permanent ones reach the report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{WizarrError, WizarrResult};
use crate::models::InvitationRequest;
use crate::report::{BatchReport, CallOutcome};
use crate::retry::RetryPolicy;
use crate::transport::InvitationTransport;

/// Receives per-index progress while a batch runs.
pub trait BatchProgress: Send + Sync {
    /// Called once before the first call.
    fn started(&self, _count: usize) {}

    /// Called after each index finished, successful or not.
    fn completed(&self, outcome: &CallOutcome, count: usize);

    /// Called once with the final report.
    fn finished(&self, _report: &BatchReport) {}
}

/// Progress sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl BatchProgress for NoProgress {
    fn completed(&self, _outcome: &CallOutcome, _count: usize) {}
}

/// Options for one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Number of invitations to create
    pub count: usize,
    /// Stop on first failure
    pub stop_on_error: bool,
}

impl BatchOptions {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            stop_on_error: false,
        }
    }

    #[must_use]
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }
}

/// Issues create-invitation calls one after another and gathers the outcomes.
pub struct BatchInvoker<T> {
    transport: T,
    retry: RetryPolicy,
    interrupted: Arc<AtomicBool>,
}

impl<T: InvitationTransport> BatchInvoker<T> {
    /// Create a new batch invoker
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self {
            transport,
            retry,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that stops the batch before its next index when set.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Create `options.count` invitations from `request`.
    ///
    /// Only configuration problems are returned as `Err`; per-invitation
    /// failures are recorded in the report.
    pub async fn run_batch(
        &self,
        request: &InvitationRequest,
        options: BatchOptions,
        progress: &dyn BatchProgress,
    ) -> WizarrResult<BatchReport> {
        if options.count < 1 {
            return Err(WizarrError::InvalidConfig(
                "count must be at least 1".to_string(),
            ));
        }
        request.validate()?;

        let start = Instant::now();
        let count = options.count;
        let mut report = BatchReport::new();

        info!(
            count,
            endpoint = %self.transport.endpoint(),
            stop_on_error = options.stop_on_error,
            "Starting invitation batch"
        );
        progress.started(count);

        for index in 1..=count {
            if self.is_interrupted() {
                warn!(attempted = report.total, count, "Batch interrupted");
                report.set_interrupted();
                break;
            }

            let outcome = match self
                .retry
                .execute("create_invitation", || {
                    self.transport.create_invitation(request)
                })
                .await
            {
                Ok(data) => {
                    debug!(index, "Invitation created");
                    CallOutcome::success(index, data)
                }
                Err(e) => {
                    warn!(index, error = %e, "Invitation failed");
                    CallOutcome::failure(index, e.to_string())
                }
            };

            let failed = !outcome.is_success();
            progress.completed(&outcome, count);
            report.record(outcome);

            if failed && options.stop_on_error {
                info!(index, "Stopping batch after first failure");
                break;
            }
        }

        report.set_duration(start.elapsed().as_millis() as u64);
        info!(
            total = report.total,
            successful = report.successful,
            failed = report.failed,
            duration_ms = report.duration_ms,
            "Invitation batch finished"
        );
        progress.finished(&report);
        Ok(report)
    }
}
