//! Condition — a safety predicate that must hold before a command is issued.

use std::fmt;

use crate::vehicle::VehicleSnapshot;

/// A named predicate evaluated against one [`VehicleSnapshot`].
///
/// Conditions are evaluated in order against the same snapshot; the first
/// failure cancels the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Requires the cabin occupancy to match `expected`.
    UserPresence { expected: bool },
    /// Requires the battery to be at least `threshold` percent.
    ///
    /// `None` (or zero) always passes.
    MinimumBattery { threshold: Option<u8> },
}

impl Condition {
    /// Check this condition against `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConditionFailure`] describing why the snapshot does not
    /// satisfy the condition.
    pub fn evaluate(&self, snapshot: &VehicleSnapshot) -> Result<(), ConditionFailure> {
        match self {
            Self::UserPresence { expected } => {
                if snapshot.is_user_present == *expected {
                    Ok(())
                } else {
                    Err(self.fail(format!(
                        "User is present: {}. Bailing out!",
                        snapshot.is_user_present
                    )))
                }
            }
            Self::MinimumBattery { threshold } => match threshold {
                Some(min) if *min > 0 && snapshot.battery_level.percent() < *min => {
                    Err(self.fail(format!(
                        "Battery level {} is below minimum required {min}%. Bailing out!",
                        snapshot.battery_level
                    )))
                }
                _ => Ok(()),
            },
        }
    }

    fn fail(&self, reason: String) -> ConditionFailure {
        ConditionFailure {
            condition: self.clone(),
            reason,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserPresence { expected } => write!(f, "user_presence({expected})"),
            Self::MinimumBattery {
                threshold: Some(min),
            } => write!(f, "minimum_battery({min}%)"),
            Self::MinimumBattery { threshold: None } => f.write_str("minimum_battery(none)"),
        }
    }
}

/// Why a [`Condition`] did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionFailure {
    pub condition: Condition,
    pub reason: String,
}

impl fmt::Display for ConditionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}
