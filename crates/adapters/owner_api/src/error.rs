//! Owner API adapter error types.

use carwake_domain::error::{AuthenticationError, CarwakeError, RemoteCallError};

/// Errors specific to the owner API adapter.
#[derive(Debug, thiserror::Error)]
pub enum OwnerApiError {
    /// The HTTP client could not be built or the request failed in flight.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The API refused the credentials or the token.
    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Any other non-success status, e.g. 408 for a sleeping vehicle.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The account has no vehicle.
    #[error("no vehicle found on this account")]
    NoVehicles,

    /// The vehicle answered but refused the command.
    #[error("command rejected: {reason}")]
    CommandRejected { reason: String },

    /// A domain-level error (out-of-range telemetry, …).
    #[error("domain error")]
    Domain(#[source] CarwakeError),
}

impl OwnerApiError {
    /// Convert into a [`CarwakeError`] for propagation across the port
    /// boundary, naming the failed `operation`.
    #[must_use]
    pub fn into_domain(self, operation: &'static str) -> CarwakeError {
        match self {
            Self::Domain(err) => err,
            other => RemoteCallError::new(operation, other).into(),
        }
    }

    /// Convert a failure of the token request.
    #[must_use]
    pub fn into_login_error(self) -> CarwakeError {
        match self {
            Self::Unauthorized { body, .. } => AuthenticationError::Rejected { reason: body }.into(),
            Self::Domain(err) => err,
            other => AuthenticationError::Transport(Box::new(other)).into(),
        }
    }
}
