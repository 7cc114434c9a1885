//! Batch outcome types
//!
//! One record per attempted invitation, gathered into a report that
//! serializes to the JSON shape printed by the CLI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A created invitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationSuccess {
    /// Always `true`; kept in the JSON for consumers that merge both lists.
    pub success: bool,
    /// Position in the batch (1-based)
    pub index: usize,
    /// Response body returned by the API
    pub data: Value,
}

/// An invitation that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationFailure {
    /// Always `false`.
    pub success: bool,
    /// Position in the batch (1-based)
    pub index: usize,
    /// Error message, including the HTTP status or transport cause
    pub error: String,
}

/// Result of a single batch index.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success(InvitationSuccess),
    Failure(InvitationFailure),
}

impl CallOutcome {
    /// Create a successful outcome
    pub fn success(index: usize, data: Value) -> Self {
        Self::Success(InvitationSuccess {
            success: true,
            index,
            data,
        })
    }

    /// Create a failed outcome
    pub fn failure(index: usize, error: impl Into<String>) -> Self {
        Self::Failure(InvitationFailure {
            success: false,
            index,
            error: error.into(),
        })
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success(s) => s.index,
            Self::Failure(f) => f.index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl InvitationSuccess {
    /// The invitation link at `data.invitation.url`, if the API returned one.
    pub fn invitation_url(&self) -> Option<&str> {
        self.data
            .get("invitation")
            .and_then(|invitation| invitation.get("url"))
            .and_then(Value::as_str)
    }
}

/// Summary of a completed batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Successful invitations, in index order
    pub results: Vec<InvitationSuccess>,
    /// Failed invitations, in index order
    pub errors: Vec<InvitationFailure>,
    /// Indices attempted
    pub total: usize,
    /// Number of successful invitations
    pub successful: usize,
    /// Number of failed invitations
    pub failed: usize,
    /// Wall-clock duration of the batch in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
    /// Whether the batch was cut short by Ctrl+C
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub interrupted: bool,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
            total: 0,
            successful: 0,
            failed: 0,
            duration_ms: 0,
            interrupted: false,
        }
    }

    /// Append the outcome of the next index.
    ///
    /// Counters move together so `successful + failed == total` holds after
    /// every call.
    pub fn record(&mut self, outcome: CallOutcome) {
        match outcome {
            CallOutcome::Success(success) => {
                self.successful += 1;
                self.results.push(success);
            }
            CallOutcome::Failure(failure) => {
                self.failed += 1;
                self.errors.push(failure);
            }
        }
        self.total += 1;
    }

    /// Mark the batch as interrupted
    pub fn set_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Set the duration
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all attempted invitations succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }

    /// Check if any invitation failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Invitation URLs of the successful calls, in index order.
    ///
    /// Successes whose payload carries no URL are skipped.
    pub fn invitation_urls(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(InvitationSuccess::invitation_url)
            .collect()
    }

    /// Indices of the successful calls
    pub fn success_indices(&self) -> Vec<usize> {
        self.results.iter().map(|r| r.index).collect()
    }

    /// Indices of the failed calls
    pub fn failure_indices(&self) -> Vec<usize> {
        self.errors.iter().map(|e| e.index).collect()
    }
}
