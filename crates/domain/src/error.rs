//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`CarwakeError`]
//! via `#[from]`. Adapters keep a private error enum and expose an
//! `into_domain()` conversion at the port boundary.

use std::error::Error as StdError;

use crate::condition::ConditionFailure;

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Top-level error for every carwake operation.
#[derive(Debug, thiserror::Error)]
pub enum CarwakeError {
    /// Login was rejected or could not be performed. No session exists.
    #[error("authentication failed")]
    Authentication(#[from] AuthenticationError),

    /// The vehicle never reported `online` and the configured policy treats
    /// that as fatal.
    #[error("vehicle did not come online after {attempts} wake attempt(s)")]
    WakeExhausted { attempts: u32 },

    /// A safety condition did not hold; the command was cancelled.
    #[error("precondition failed")]
    Precondition(#[from] PreconditionFailed),

    /// Transport or API error while talking to the vehicle service.
    #[error("remote call failed")]
    Remote(#[from] RemoteCallError),

    /// A domain value was out of range.
    #[error("validation error")]
    Validation(#[from] ValidationError),
}

impl CarwakeError {
    /// Render the error and all of its sources on one line.
    #[must_use]
    pub fn chain(&self) -> String {
        render_chain(self)
    }
}

/// Render `err` followed by each of its sources, separated by `": "`.
#[must_use]
pub fn render_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

/// Login failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    /// The service refused the credentials.
    #[error("credentials rejected: {reason}")]
    Rejected { reason: String },

    /// Credentials were missing from the configuration.
    #[error("no credentials configured")]
    MissingCredentials,

    /// The login request itself failed (network, unexpected payload, …).
    #[error("login request failed")]
    Transport(#[source] BoxError),
}

/// A condition of the gate did not hold against the fetched snapshot.
#[derive(Debug, thiserror::Error)]
#[error("{failure}")]
pub struct PreconditionFailed {
    pub failure: ConditionFailure,
}

impl PreconditionFailed {
    /// Human readable reason, suitable for logs.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.failure.reason
    }
}

impl From<ConditionFailure> for PreconditionFailed {
    fn from(failure: ConditionFailure) -> Self {
        Self { failure }
    }
}

impl From<ConditionFailure> for CarwakeError {
    fn from(failure: ConditionFailure) -> Self {
        Self::Precondition(failure.into())
    }
}

/// A call to the vehicle service failed.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed")]
pub struct RemoteCallError {
    /// Name of the remote operation (`"wake"`, `"start_climate"`, …).
    pub operation: &'static str,
    #[source]
    pub source: BoxError,
}

impl RemoteCallError {
    /// Wrap any error as the failure of `operation`.
    pub fn new(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("battery level {0}% is out of range (0..=100)")]
    BatteryOutOfRange(i64),

    #[error("wake attempts must be at least 1")]
    NoWakeAttempts,
}
