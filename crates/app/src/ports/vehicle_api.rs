//! Vehicle API port — the remote service that owns the vehicle.
//!
//! Implementations live in adapter crates (the HTTP owner-API client, the
//! virtual vehicle). Every call is a single outbound request; retries are the
//! caller's business.

use std::future::Future;

use carwake_domain::command::CommandAck;
use carwake_domain::error::CarwakeError;
use carwake_domain::id::VehicleId;
use carwake_domain::session::{AuthToken, Credentials, Session};
use carwake_domain::vehicle::{VehicleSnapshot, VehicleState};

/// Session-authenticated access to one vehicle.
///
/// The session runner calls the methods in this order:
///
/// 1. [`login`](Self::login) then [`fetch_vehicle`](Self::fetch_vehicle) to build a [`Session`]
/// 2. [`wake`](Self::wake), possibly several times
/// 3. [`fetch_vehicle_state`](Self::fetch_vehicle_state) once per gate evaluation
/// 4. one command ([`start_climate`](Self::start_climate), …)
/// 5. [`logout`](Self::logout), always, once a token exists
pub trait VehicleApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    ///
    /// Rejected credentials must surface as [`CarwakeError::Authentication`].
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthToken, CarwakeError>> + Send;

    /// Resolve the vehicle the account controls.
    fn fetch_vehicle(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<VehicleId, CarwakeError>> + Send;

    /// Ask the vehicle to come online and return the state it reports.
    fn wake(&self, session: &Session)
    -> impl Future<Output = Result<VehicleState, CarwakeError>> + Send;

    /// Fetch fresh telemetry.
    fn fetch_vehicle_state(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<VehicleSnapshot, CarwakeError>> + Send;

    fn start_climate(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<CommandAck, CarwakeError>> + Send;

    fn stop_climate(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<CommandAck, CarwakeError>> + Send;

    fn set_sentry_mode(
        &self,
        session: &Session,
        enabled: bool,
    ) -> impl Future<Output = Result<CommandAck, CarwakeError>> + Send;

    /// Harmless visible signal, used in place of real commands on dry runs.
    fn flash_lights(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<CommandAck, CarwakeError>> + Send;

    /// Revoke the token.
    fn logout(&self, token: &AuthToken) -> impl Future<Output = Result<(), CarwakeError>> + Send;
}
