//! Vehicle telemetry and reachability state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ValidationError;

/// State of charge as a whole percentage, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Build a level from a raw percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BatteryOutOfRange`] when `percent` is not
    /// within `0..=100`.
    pub fn new(percent: i64) -> Result<Self, ValidationError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(ValidationError::BatteryOutOfRange(percent))
    }

    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Point-in-time view of the vehicle telemetry the gate needs.
///
/// A snapshot is fetched fresh for every gate evaluation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSnapshot {
    pub is_user_present: bool,
    pub battery_level: BatteryLevel,
    /// When the telemetry was read, in UTC.
    pub fetched_at: DateTime<Utc>,
}

impl VehicleSnapshot {
    #[must_use]
    pub fn new(is_user_present: bool, battery_level: BatteryLevel) -> Self {
        Self {
            is_user_present,
            battery_level,
            fetched_at: Utc::now(),
        }
    }
}

/// Reachability state reported by a wake request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum VehicleState {
    Online,
    Asleep,
    Offline,
    /// Any state this client does not know about, kept verbatim.
    Other(String),
}

impl VehicleState {
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Asleep => "asleep",
            Self::Offline => "offline",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for VehicleState {
    fn from(value: &str) -> Self {
        match value {
            "online" => Self::Online,
            "asleep" => Self::Asleep,
            "offline" => Self::Offline,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for VehicleState {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for VehicleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
