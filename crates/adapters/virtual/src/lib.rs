//! # carwake-adapter-virtual
//!
//! Virtual vehicle that implements the `VehicleApi` port without any network
//! access, for dry runs and end-to-end tests.
//!
//! ## Behaviour
//!
//! | Operation | Simulation |
//! |-----------|------------|
//! | `login` | Hands out a fresh token, or refuses when `reject_login` is set |
//! | `wake` | Reports `asleep` until `wakes_until_online` requests were made |
//! | telemetry & commands | Fail with a 408-like error while the car is asleep |
//! | `logout` | Revokes the token; later calls with it fail |
//!
//! Every call is recorded so tests can assert on the exact sequence.
//!
//! ## Dependency rule
//!
//! Depends on `carwake-app` (port traits) and `carwake-domain` only.

mod config;
mod error;

use std::sync::{Mutex, MutexGuard, PoisonError};

use carwake_app::ports::VehicleApi;
use carwake_domain::command::CommandAck;
use carwake_domain::error::CarwakeError;
use carwake_domain::id::VehicleId;
use carwake_domain::session::{AuthToken, Credentials, Session};
use carwake_domain::vehicle::{BatteryLevel, VehicleSnapshot, VehicleState};

pub use config::VirtualConfig;
pub use error::VirtualError;

/// A call received by the virtual vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleCall {
    Login,
    FetchVehicle,
    Wake,
    FetchVehicleState,
    StartClimate,
    StopClimate,
    SetSentryMode(bool),
    FlashLights,
    Logout,
}

/// Observable state of the simulated car.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualState {
    pub online: bool,
    pub climate_on: bool,
    pub sentry_mode: bool,
    pub lights_flashed: u32,
    pub session_open: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: VirtualState,
    wakes: u32,
    logins: u32,
    token: Option<AuthToken>,
    calls: Vec<VehicleCall>,
}

/// Simulated vehicle.
pub struct VirtualVehicle {
    config: VirtualConfig,
    inner: Mutex<Inner>,
}

impl Default for VirtualVehicle {
    fn default() -> Self {
        Self::new(VirtualConfig::default())
    }
}

impl VirtualVehicle {
    #[must_use]
    pub fn new(config: VirtualConfig) -> Self {
        let inner = Inner {
            state: VirtualState {
                online: config.wakes_until_online == 0,
                ..VirtualState::default()
            },
            ..Inner::default()
        };
        Self {
            config,
            inner: Mutex::new(inner),
        }
    }

    /// Current simulated state.
    #[must_use]
    pub fn state(&self) -> VirtualState {
        self.lock().state.clone()
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<VehicleCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and check the token; returns the guard for further work.
    fn authorized(
        &self,
        call: VehicleCall,
        token: &AuthToken,
    ) -> Result<MutexGuard<'_, Inner>, VirtualError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.token.as_ref() != Some(token) {
            return Err(VirtualError::InvalidToken);
        }
        Ok(inner)
    }

    /// Like [`authorized`](Self::authorized), and the car must be awake.
    fn awake(
        &self,
        call: VehicleCall,
        session: &Session,
    ) -> Result<MutexGuard<'_, Inner>, VirtualError> {
        let inner = self.authorized(call, &session.token)?;
        if !inner.state.online {
            return Err(VirtualError::Asleep);
        }
        Ok(inner)
    }

    fn command(
        &self,
        call: VehicleCall,
        session: &Session,
        apply: impl FnOnce(&mut VirtualState),
    ) -> Result<CommandAck, VirtualError> {
        let mut inner = self.awake(call, session)?;
        if self.config.fail_commands {
            return Err(VirtualError::CommandRejected);
        }
        apply(&mut inner.state);
        tracing::debug!(?call, state = ?inner.state, "virtual vehicle accepted command");
        Ok(CommandAck::accepted())
    }
}

impl VehicleApi for VirtualVehicle {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, CarwakeError> {
        let mut inner = self.lock();
        inner.calls.push(VehicleCall::Login);
        if self.config.reject_login {
            return Err(VirtualError::LoginRefused.into_domain("login"));
        }
        inner.logins += 1;
        let token = AuthToken::new(format!("virtual-{}-{}", credentials.username, inner.logins));
        inner.token = Some(token.clone());
        inner.state.session_open = true;
        Ok(token)
    }

    async fn fetch_vehicle(&self, token: &AuthToken) -> Result<VehicleId, CarwakeError> {
        drop(
            self.authorized(VehicleCall::FetchVehicle, token)
                .map_err(|err| err.into_domain("fetch_vehicle"))?,
        );
        Ok(VehicleId::new(self.config.vehicle_id))
    }

    async fn wake(&self, session: &Session) -> Result<VehicleState, CarwakeError> {
        let mut inner = self
            .authorized(VehicleCall::Wake, &session.token)
            .map_err(|err| err.into_domain("wake"))?;
        inner.wakes += 1;
        if inner.wakes >= self.config.wakes_until_online {
            inner.state.online = true;
        }
        Ok(if inner.state.online {
            VehicleState::Online
        } else {
            VehicleState::Asleep
        })
    }

    async fn fetch_vehicle_state(&self, session: &Session) -> Result<VehicleSnapshot, CarwakeError> {
        self.awake(VehicleCall::FetchVehicleState, session)
            .map_err(|err| err.into_domain("fetch_vehicle_state"))?;
        let battery = BatteryLevel::new(i64::from(self.config.battery_level))?;
        Ok(VehicleSnapshot::new(self.config.user_present, battery))
    }

    async fn start_climate(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(VehicleCall::StartClimate, session, |s| s.climate_on = true)
            .map_err(|err| err.into_domain("start_climate"))
    }

    async fn stop_climate(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(VehicleCall::StopClimate, session, |s| s.climate_on = false)
            .map_err(|err| err.into_domain("stop_climate"))
    }

    async fn set_sentry_mode(
        &self,
        session: &Session,
        enabled: bool,
    ) -> Result<CommandAck, CarwakeError> {
        self.command(VehicleCall::SetSentryMode(enabled), session, |s| {
            s.sentry_mode = enabled;
        })
        .map_err(|err| err.into_domain("set_sentry_mode"))
    }

    async fn flash_lights(&self, session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(VehicleCall::FlashLights, session, |s| s.lights_flashed += 1)
            .map_err(|err| err.into_domain("flash_lights"))
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), CarwakeError> {
        let mut inner = self
            .authorized(VehicleCall::Logout, token)
            .map_err(|err| err.into_domain("logout"))?;
        inner.token = None;
        inner.state.session_open = false;
        Ok(())
    }
}
