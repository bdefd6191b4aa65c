//! Virtual vehicle configuration.

use serde::Deserialize;

/// How the simulated vehicle behaves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Identifier reported by the vehicle lookup.
    pub vehicle_id: u64,
    /// Number of wake requests before the vehicle reports `online`.
    ///
    /// `0` means the vehicle is already awake.
    pub wakes_until_online: u32,
    /// Whether somebody sits in the cabin.
    pub user_present: bool,
    /// State of charge, in percent.
    pub battery_level: u8,
    /// Refuse every login attempt.
    pub reject_login: bool,
    /// Fail every command with a remote error.
    pub fail_commands: bool,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            vehicle_id: 1,
            wakes_until_online: 1,
            user_present: false,
            battery_level: 80,
            reject_login: false,
            fail_commands: false,
        }
    }
}
