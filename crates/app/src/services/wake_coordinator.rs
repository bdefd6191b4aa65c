//! Wake coordinator — brings a sleeping vehicle online before it is
//! commanded.
//!
//! Commands sent to a sleeping vehicle time out, so every step starts with a
//! bounded wake-up loop: a fixed number of attempts separated by a constant
//! interval.

use std::time::Duration;

use carwake_domain::error::{CarwakeError, ValidationError};
use carwake_domain::session::Session;
use carwake_domain::wake::{ExhaustedWakePolicy, LastWakeResponse, WakeOutcome};

use crate::ports::VehicleApi;

/// Retry budget of the wake loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeSettings {
    max_attempts: u32,
    interval: Duration,
    on_exhausted: ExhaustedWakePolicy,
}

impl Default for WakeSettings {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            interval: Duration::from_secs(15),
            on_exhausted: ExhaustedWakePolicy::Proceed,
        }
    }
}

impl WakeSettings {
    /// # Errors
    ///
    /// Returns [`ValidationError::NoWakeAttempts`] when `max_attempts` is zero.
    pub fn new(
        max_attempts: u32,
        interval: Duration,
        on_exhausted: ExhaustedWakePolicy,
    ) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::NoWakeAttempts);
        }
        Ok(Self {
            max_attempts,
            interval,
            on_exhausted,
        })
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Repeatedly asks the vehicle to come online.
pub struct WakeCoordinator<'a, V> {
    api: &'a V,
    settings: WakeSettings,
}

impl<'a, V: VehicleApi> WakeCoordinator<'a, V> {
    pub fn new(api: &'a V, settings: WakeSettings) -> Self {
        Self { api, settings }
    }

    /// Wake the vehicle, retrying until it reports `online` or the attempt
    /// budget is spent.
    ///
    /// A failed wake request counts as an attempt and does not stop the loop.
    /// Exhaustion is returned as [`WakeOutcome::Exhausted`] so the caller can
    /// carry on optimistically.
    ///
    /// # Errors
    ///
    /// Returns [`CarwakeError::WakeExhausted`] only when the settings use
    /// [`ExhaustedWakePolicy::Abort`].
    #[tracing::instrument(skip_all, fields(vehicle_id = %session.vehicle_id))]
    pub async fn wake(&self, session: &Session) -> Result<WakeOutcome, CarwakeError> {
        let max = self.settings.max_attempts;
        let mut attempt = 1;

        loop {
            tracing::debug!("Attempt {attempt} of {max} to wake up the car.");

            let last = match self.api.wake(session).await {
                Ok(state) if state.is_online() => {
                    tracing::debug!("Car is now online!");
                    return Ok(WakeOutcome::Online { attempts: attempt });
                }
                Ok(state) => {
                    tracing::debug!(%state, "car is not online yet");
                    LastWakeResponse::State(state)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "I got an error trying to wake up the car.");
                    LastWakeResponse::Error(err.chain())
                }
            };

            if attempt >= max {
                tracing::debug!(
                    "I tried {max} times to wake up the car, but it is still not online. Giving up."
                );
                return match self.settings.on_exhausted {
                    ExhaustedWakePolicy::Proceed => Ok(WakeOutcome::Exhausted {
                        attempts: attempt,
                        last,
                    }),
                    ExhaustedWakePolicy::Abort => {
                        Err(CarwakeError::WakeExhausted { attempts: attempt })
                    }
                };
            }

            attempt += 1;
            tracing::debug!(
                "Waiting {} seconds before trying again.",
                self.settings.interval.as_secs()
            );
            tokio::time::sleep(self.settings.interval).await;
        }
    }
}
