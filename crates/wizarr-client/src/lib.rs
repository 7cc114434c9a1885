//! # Wizarr client
//!
//! Creates invitations on a Wizarr server through its REST API, one call at a
//! time, with bounded retry for transient failures.
//!
//! ## Example
//!
//! ```ignore
//! use wizarr_client::{BatchInvoker, BatchOptions, ClientConfig, HttpTransport, InvitationRequest, NoProgress};
//!
//! let config = ClientConfig::new("wizarr.example.com", "my-api-key")?;
//! let retry = config.retry.clone();
//! let invoker = BatchInvoker::new(HttpTransport::new(config)?, retry);
//!
//! let request = InvitationRequest::new(vec![1]);
//! let report = invoker.run_batch(&request, BatchOptions::new(5), &NoProgress).await?;
//! for url in report.invitation_urls() {
//!     println!("{url}");
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod retry;
pub mod transport;

pub use batch::{BatchInvoker, BatchOptions, BatchProgress, NoProgress};
pub use config::{ClientConfig, API_KEY_HEADER, DEFAULT_BASE_URL, INVITATIONS_PATH};
pub use error::{WizarrError, WizarrResult};
pub use models::{AccessDuration, ExpiresInDays, InvitationRequest};
pub use report::{BatchReport, CallOutcome, InvitationFailure, InvitationSuccess};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, InvitationTransport};
