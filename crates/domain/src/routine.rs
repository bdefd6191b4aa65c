//! Routine — the plan of one invocation: a gated command and an optional
//! delayed follow-up.

use std::time::Duration;

use crate::command::CommandIntent;
use crate::condition::Condition;

/// Default time climate control stays on before the follow-up stops it.
pub const DEFAULT_CLIMATE_ON: Duration = Duration::from_secs(10 * 60);

/// Default minimum battery required to start a power-consuming command.
pub const DEFAULT_MIN_BATTERY_PERCENT: u8 = 20;

/// A command together with the conditions gating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub intent: CommandIntent,
    pub conditions: Vec<Condition>,
}

impl Step {
    /// Build a step gated on an empty cabin and the given battery threshold.
    #[must_use]
    pub fn unoccupied(intent: CommandIntent, min_battery: Option<u8>) -> Self {
        Self {
            intent,
            conditions: vec![
                Condition::MinimumBattery {
                    threshold: min_battery,
                },
                Condition::UserPresence { expected: false },
            ],
        }
    }
}

/// A step that runs once after a delay, re-entering wake and gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub delay: Duration,
    pub step: Step,
}

/// Everything one invocation does between login and logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub name: &'static str,
    pub primary: Step,
    pub follow_up: Option<FollowUp>,
}

impl Routine {
    /// Pre-condition the cabin: start climate if the car is empty and charged
    /// enough, then stop it again after `climate_on` if the cabin is still
    /// empty.
    #[must_use]
    pub fn climate(min_battery: Option<u8>, climate_on: Duration) -> Self {
        Self {
            name: "climate",
            primary: Step::unoccupied(CommandIntent::StartClimate, min_battery),
            follow_up: Some(FollowUp {
                delay: climate_on,
                step: Step::unoccupied(CommandIntent::StopClimate, None),
            }),
        }
    }

    /// Enable sentry mode if the car is empty.
    #[must_use]
    pub fn sentry(min_battery: Option<u8>) -> Self {
        Self {
            name: "sentry",
            primary: Step::unoccupied(CommandIntent::SetSentryMode { enabled: true }, min_battery),
            follow_up: None,
        }
    }
}
