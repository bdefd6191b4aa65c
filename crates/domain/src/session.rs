//! Credentials and the authenticated session handle.

use std::fmt;

use crate::id::VehicleId;

/// Username/password pair used to log in to the vehicle service.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: Secret,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret(password.into()),
        }
    }

    /// The plain-text password, only for handing to the login call.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose()
    }

    /// Whether both fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.expose().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password)
            .finish()
    }
}

/// A string that never shows up in logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Bearer token returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Secret);

impl AuthToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Secret(value.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.0).finish()
    }
}

/// Authenticated handle bound to one vehicle of the account.
///
/// Owned by the session runner for a single invocation and released by
/// logging out, whatever the outcome of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AuthToken,
    pub vehicle_id: VehicleId,
}

impl Session {
    #[must_use]
    pub fn new(token: AuthToken, vehicle_id: VehicleId) -> Self {
        Self { token, vehicle_id }
    }
}
