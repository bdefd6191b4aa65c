//! Command executor — issues the one command a step was gated for.

use carwake_domain::command::{CommandAck, CommandIntent};
use carwake_domain::error::CarwakeError;
use carwake_domain::session::Session;

use crate::ports::VehicleApi;

/// One-shot dispatch of a [`CommandIntent`] to the matching remote call.
///
/// With `dry_run` set every intent is replaced by a light flash, which lets a
/// schedule be validated without touching the vehicle's systems.
pub struct CommandExecutor<'a, V> {
    api: &'a V,
    dry_run: bool,
}

impl<'a, V: VehicleApi> CommandExecutor<'a, V> {
    pub fn new(api: &'a V, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Issue `intent`. No retries happen here.
    ///
    /// # Errors
    ///
    /// Propagates the error of the remote call.
    #[tracing::instrument(skip(self, session), fields(vehicle_id = %session.vehicle_id, dry_run = self.dry_run))]
    pub async fn execute(
        &self,
        session: &Session,
        intent: CommandIntent,
    ) -> Result<CommandAck, CarwakeError> {
        if self.dry_run {
            tracing::debug!("dry run: flashing lights instead of {intent}");
            return self.api.flash_lights(session).await;
        }

        let ack = match intent {
            CommandIntent::StartClimate => {
                tracing::debug!("starting climate");
                self.api.start_climate(session).await?
            }
            CommandIntent::StopClimate => {
                tracing::debug!("stopping climate");
                self.api.stop_climate(session).await?
            }
            CommandIntent::SetSentryMode { enabled } => {
                tracing::debug!(enabled, "setting sentry mode");
                self.api.set_sentry_mode(session, enabled).await?
            }
        };
        tracing::trace!(?ack, "command acknowledged");
        Ok(ack)
    }
}
