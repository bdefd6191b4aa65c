//! Virtual vehicle error types.

use carwake_domain::error::{AuthenticationError, CarwakeError, RemoteCallError};

/// Failures the simulated vehicle can produce.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The simulated account refuses the credentials.
    #[error("login refused by virtual vehicle")]
    LoginRefused,

    /// The token is not the one handed out by the last login.
    #[error("unknown or revoked token")]
    InvalidToken,

    /// The vehicle is asleep; mirrors the 408 of a real service.
    #[error("vehicle unavailable (408)")]
    Asleep,

    /// Commands were configured to fail.
    #[error("command rejected by virtual vehicle")]
    CommandRejected,
}

impl VirtualError {
    /// Convert into a [`CarwakeError`] for propagation across the port
    /// boundary, naming the failed `operation`.
    #[must_use]
    pub fn into_domain(self, operation: &'static str) -> CarwakeError {
        match self {
            Self::LoginRefused => AuthenticationError::Rejected {
                reason: Self::LoginRefused.to_string(),
            }
            .into(),
            other => RemoteCallError::new(operation, other).into(),
        }
    }
}
