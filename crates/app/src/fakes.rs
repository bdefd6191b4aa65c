//! Scripted in-memory [`VehicleApi`] shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use carwake_domain::command::CommandAck;
use carwake_domain::error::{AuthenticationError, CarwakeError, RemoteCallError};
use carwake_domain::id::VehicleId;
use carwake_domain::session::{AuthToken, Credentials, Session};
use carwake_domain::vehicle::{BatteryLevel, VehicleSnapshot, VehicleState};

use crate::ports::VehicleApi;

/// Every call the fake received, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
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

pub struct ScriptedVehicle {
    pub reject_login: bool,
    pub fail_fetch_vehicle: bool,
    /// Responses for successive wake calls; `None` is a transport error.
    /// Once drained every wake reports `asleep`.
    pub wakes: Mutex<VecDeque<Option<VehicleState>>>,
    /// Telemetry for successive fetches as `(user_present, battery)`.
    /// Once drained `user_present` and `battery` are reported.
    pub telemetry: Mutex<VecDeque<(bool, u8)>>,
    pub user_present: bool,
    pub battery: u8,
    pub fail_telemetry: bool,
    pub fail_commands: bool,
    pub fail_logout: bool,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedVehicle {
    fn default() -> Self {
        Self {
            reject_login: false,
            fail_fetch_vehicle: false,
            wakes: Mutex::new(VecDeque::from([Some(VehicleState::Online)])),
            telemetry: Mutex::new(VecDeque::new()),
            user_present: false,
            battery: 80,
            fail_telemetry: false,
            fail_commands: false,
            fail_logout: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedVehicle {
    pub fn with_wakes(wakes: impl IntoIterator<Item = Option<VehicleState>>) -> Self {
        Self {
            wakes: Mutex::new(wakes.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn commands(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::StartClimate
                        | Call::StopClimate
                        | Call::SetSentryMode(_)
                        | Call::FlashLights
                )
            })
            .collect()
    }

    pub fn session() -> Session {
        Session::new(AuthToken::new("token"), VehicleId::new(1))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn command(&self, call: Call, operation: &'static str) -> Result<CommandAck, CarwakeError> {
        self.record(call);
        if self.fail_commands {
            return Err(RemoteCallError::new(operation, "vehicle unavailable (408)").into());
        }
        Ok(CommandAck::accepted())
    }
}

impl VehicleApi for ScriptedVehicle {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthToken, CarwakeError> {
        self.record(Call::Login);
        if self.reject_login {
            return Err(AuthenticationError::Rejected {
                reason: "invalid_grant".to_string(),
            }
            .into());
        }
        Ok(AuthToken::new("token"))
    }

    async fn fetch_vehicle(&self, _token: &AuthToken) -> Result<VehicleId, CarwakeError> {
        self.record(Call::FetchVehicle);
        if self.fail_fetch_vehicle {
            return Err(RemoteCallError::new("fetch_vehicle", "no vehicles").into());
        }
        Ok(VehicleId::new(1))
    }

    async fn wake(&self, _session: &Session) -> Result<VehicleState, CarwakeError> {
        self.record(Call::Wake);
        let next = self.wakes.lock().unwrap().pop_front();
        match next {
            Some(Some(state)) => Ok(state),
            Some(None) => Err(RemoteCallError::new("wake", "timed out").into()),
            None => Ok(VehicleState::Asleep),
        }
    }

    async fn fetch_vehicle_state(
        &self,
        _session: &Session,
    ) -> Result<VehicleSnapshot, CarwakeError> {
        self.record(Call::FetchVehicleState);
        if self.fail_telemetry {
            return Err(RemoteCallError::new("fetch_vehicle_state", "vehicle unavailable").into());
        }
        let next = self.telemetry.lock().unwrap().pop_front();
        let (present, battery) = next.unwrap_or((self.user_present, self.battery));
        let battery = BatteryLevel::new(i64::from(battery))?;
        Ok(VehicleSnapshot::new(present, battery))
    }

    async fn start_climate(&self, _session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(Call::StartClimate, "start_climate")
    }

    async fn stop_climate(&self, _session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(Call::StopClimate, "stop_climate")
    }

    async fn set_sentry_mode(
        &self,
        _session: &Session,
        enabled: bool,
    ) -> Result<CommandAck, CarwakeError> {
        self.command(Call::SetSentryMode(enabled), "set_sentry_mode")
    }

    async fn flash_lights(&self, _session: &Session) -> Result<CommandAck, CarwakeError> {
        self.command(Call::FlashLights, "flash_lights")
    }

    async fn logout(&self, _token: &AuthToken) -> Result<(), CarwakeError> {
        self.record(Call::Logout);
        if self.fail_logout {
            return Err(RemoteCallError::new("logout", "connection reset").into());
        }
        Ok(())
    }
}
