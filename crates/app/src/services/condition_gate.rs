//! Condition gate — refuses to command an occupied or under-charged vehicle.

use carwake_domain::condition::Condition;
use carwake_domain::error::CarwakeError;
use carwake_domain::session::Session;
use carwake_domain::vehicle::VehicleSnapshot;

use crate::ports::VehicleApi;

/// Evaluates an ordered list of [`Condition`]s against one telemetry fetch.
pub struct ConditionGate<'a, V> {
    api: &'a V,
}

impl<'a, V: VehicleApi> ConditionGate<'a, V> {
    pub fn new(api: &'a V) -> Self {
        Self { api }
    }

    /// Fetch one snapshot and check every condition against it, in order.
    ///
    /// Evaluation stops at the first failing condition. Returns the snapshot
    /// the conditions were checked against.
    ///
    /// # Errors
    ///
    /// Returns [`CarwakeError::Precondition`] with the reason of the first
    /// failing condition, or the error of the telemetry fetch.
    #[tracing::instrument(skip_all, fields(vehicle_id = %session.vehicle_id, conditions = conditions.len()))]
    pub async fn check_all(
        &self,
        session: &Session,
        conditions: &[Condition],
    ) -> Result<VehicleSnapshot, CarwakeError> {
        tracing::debug!("Fetching vehicle data");
        let snapshot = self.api.fetch_vehicle_state(session).await?;
        tracing::trace!(?snapshot, "vehicle data");

        for condition in conditions {
            if let Err(failure) = condition.evaluate(&snapshot) {
                tracing::warn!(%condition, "{}", failure.reason);
                return Err(failure.into());
            }
            tracing::debug!(%condition, "{}", passed_message(condition, &snapshot));
        }

        Ok(snapshot)
    }
}

fn passed_message(condition: &Condition, snapshot: &VehicleSnapshot) -> String {
    match condition {
        Condition::UserPresence { .. } => {
            format!("User is present: {}. Proceeding.", snapshot.is_user_present)
        }
        Condition::MinimumBattery { .. } => {
            format!("Battery is at {}. Proceeding.", snapshot.battery_level)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Call, ScriptedVehicle};

    fn vehicle(user_present: bool, battery: u8) -> ScriptedVehicle {
        ScriptedVehicle {
            user_present,
            battery,
            ..ScriptedVehicle::default()
        }
    }

    fn start_conditions() -> Vec<Condition> {
        vec![
            Condition::MinimumBattery {
                threshold: Some(20),
            },
            Condition::UserPresence { expected: false },
        ]
    }

    #[tokio::test]
    async fn should_fail_when_user_is_present_regardless_of_battery() {
        for battery in [0, 15, 50, 100] {
            let api = vehicle(true, battery);
            let err = ConditionGate::new(&api)
                .check_all(
                    &ScriptedVehicle::session(),
                    &[Condition::UserPresence { expected: false }],
                )
                .await
                .unwrap_err();

            match err {
                CarwakeError::Precondition(failed) => {
                    assert_eq!(failed.reason(), "User is present: true. Bailing out!");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn should_fail_with_battery_reason_when_below_minimum() {
        let api = vehicle(false, 15);
        let err = ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &start_conditions())
            .await
            .unwrap_err();

        match err {
            CarwakeError::Precondition(failed) => {
                assert_eq!(
                    failed.reason(),
                    "Battery level 15% is below minimum required 20%. Bailing out!"
                );
                assert_eq!(
                    failed.failure.condition,
                    Condition::MinimumBattery {
                        threshold: Some(20)
                    }
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_pass_when_cabin_empty_and_battery_sufficient() {
        let api = vehicle(false, 50);
        let snapshot = ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &start_conditions())
            .await
            .unwrap();

        assert_eq!(snapshot.battery_level.percent(), 50);
        assert!(!snapshot.is_user_present);
    }

    #[tokio::test]
    async fn should_fetch_telemetry_exactly_once_for_all_conditions() {
        let api = vehicle(false, 50);
        ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &start_conditions())
            .await
            .unwrap();

        assert_eq!(api.calls(), vec![Call::FetchVehicleState]);
    }

    #[tokio::test]
    async fn should_stop_at_first_failing_condition() {
        // Both conditions fail; the battery one comes first.
        let api = vehicle(true, 5);
        let err = ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &start_conditions())
            .await
            .unwrap_err();

        match err {
            CarwakeError::Precondition(failed) => {
                assert!(failed.reason().starts_with("Battery level 5%"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_ignore_battery_when_threshold_is_none() {
        let api = vehicle(false, 3);
        let result = ConditionGate::new(&api)
            .check_all(
                &ScriptedVehicle::session(),
                &[
                    Condition::MinimumBattery { threshold: None },
                    Condition::UserPresence { expected: false },
                ],
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_propagate_telemetry_fetch_failure() {
        let api = ScriptedVehicle {
            fail_telemetry: true,
            ..ScriptedVehicle::default()
        };
        let err = ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &start_conditions())
            .await
            .unwrap_err();

        assert!(matches!(err, CarwakeError::Remote(_)));
    }

    #[tokio::test]
    async fn should_pass_empty_condition_list_after_fetching() {
        let api = vehicle(true, 0);
        let result = ConditionGate::new(&api)
            .check_all(&ScriptedVehicle::session(), &[])
            .await;

        assert!(result.is_ok());
        assert_eq!(api.count(Call::FetchVehicleState), 1);
    }
}
