//! JSON payloads exchanged with the owner API.
//!
//! Only the fields carwake reads are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

use carwake_domain::error::CarwakeError;
use carwake_domain::vehicle::{BatteryLevel, VehicleSnapshot, VehicleState};

#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RevokeRequest<'a> {
    pub token: &'a str,
}

/// Every `/api/1` response wraps its payload in `{"response": …}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

#[derive(Debug, Deserialize)]
pub struct VehicleSummary {
    pub id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WakeUpResponse {
    pub state: VehicleState,
}

#[derive(Debug, Deserialize)]
pub struct VehicleData {
    pub vehicle_state: VehicleStateData,
    pub charge_state: ChargeState,
}

#[derive(Debug, Deserialize)]
pub struct VehicleStateData {
    pub is_user_present: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChargeState {
    pub battery_level: i64,
}

impl TryFrom<VehicleData> for VehicleSnapshot {
    type Error = CarwakeError;

    fn try_from(data: VehicleData) -> Result<Self, Self::Error> {
        let battery = BatteryLevel::new(data.charge_state.battery_level)?;
        Ok(VehicleSnapshot::new(
            data.vehicle_state.is_user_present,
            battery,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct SentryModeRequest {
    pub on: bool,
}
