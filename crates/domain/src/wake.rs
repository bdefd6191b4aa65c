//! Wake outcome — the terminal result of the wake-up retry loop.

use serde::Deserialize;

use crate::vehicle::VehicleState;

/// What the last wake attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastWakeResponse {
    /// The service answered with a state other than `online`.
    State(VehicleState),
    /// The wake request itself failed; holds the rendered error.
    Error(String),
}

/// Terminal outcome of waking the vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    /// The vehicle reported `online` on attempt `attempts`.
    Online { attempts: u32 },
    /// The retry budget ran out before the vehicle came online.
    Exhausted { attempts: u32, last: LastWakeResponse },
}

impl WakeOutcome {
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Online { .. })
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Online { attempts } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// What to do when the vehicle never comes online.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedWakePolicy {
    /// Carry on and let the condition gate or the command fail cleanly.
    #[default]
    Proceed,
    /// Abort the run with [`CarwakeError::WakeExhausted`](crate::error::CarwakeError::WakeExhausted).
    Abort,
}
