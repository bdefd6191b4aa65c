//! Session runner — drives one invocation from login to logout.
//!
//! ```text
//! LoggingIn → WakingVehicle → CheckingConditions → ExecutingCommand
//!     [→ AwaitingFollowUp → WakingVehicle → CheckingConditions → ExecutingFollowUpCommand]
//!     → LoggingOut → Done
//! ```
//!
//! Any failure after login jumps straight to `LoggingOut`. A failed login
//! ends the run before a session exists, so nothing is logged out.

use carwake_domain::command::CommandIntent;
use carwake_domain::error::CarwakeError;
use carwake_domain::id::RunId;
use carwake_domain::routine::{Routine, Step};
use carwake_domain::run::{RunOutcome, RunReport, RunStage};
use carwake_domain::session::{AuthToken, Credentials, Session};

use crate::ports::VehicleApi;
use crate::services::command_executor::CommandExecutor;
use crate::services::condition_gate::ConditionGate;
use crate::services::wake_coordinator::{WakeCoordinator, WakeSettings};

/// Knobs shared by every stage of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    pub wake: WakeSettings,
    /// Flash the lights instead of issuing real commands.
    pub dry_run: bool,
}

/// Orchestrates login, wake, gating, execution and logout for one vehicle.
pub struct SessionRunner<V> {
    api: V,
    settings: RunnerSettings,
}

/// Stages visited and commands issued so far.
#[derive(Debug, Default)]
struct Progress {
    stages: Vec<RunStage>,
    issued: Vec<CommandIntent>,
}

impl Progress {
    fn enter(&mut self, stage: RunStage) {
        tracing::debug!(%stage, "entering stage");
        self.stages.push(stage);
    }

    fn current(&self) -> RunStage {
        self.stages.last().copied().unwrap_or(RunStage::LoggingIn)
    }
}

impl<V: VehicleApi> SessionRunner<V> {
    pub fn new(api: V, settings: RunnerSettings) -> Self {
        Self { api, settings }
    }

    /// Access the underlying vehicle API.
    pub fn api(&self) -> &V {
        &self.api
    }

    /// Run `routine` for the vehicle of `credentials`' account.
    ///
    /// Once logged in, every exit path logs out exactly once. Cancelled or
    /// aborted runs are reported through [`RunReport::outcome`], not as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns the login error when authentication fails. No session exists
    /// in that case and logout is not attempted.
    pub async fn run(
        &self,
        credentials: &Credentials,
        routine: &Routine,
    ) -> Result<RunReport, CarwakeError> {
        self.run_with_id(RunId::new(), credentials, routine).await
    }

    #[tracing::instrument(skip_all, fields(run_id = %run_id, routine = routine.name))]
    async fn run_with_id(
        &self,
        run_id: RunId,
        credentials: &Credentials,
        routine: &Routine,
    ) -> Result<RunReport, CarwakeError> {
        let mut progress = Progress::default();

        progress.enter(RunStage::LoggingIn);
        let token = match self.api.login(credentials).await {
            Ok(token) => {
                tracing::debug!("You've got an auth token!");
                token
            }
            Err(err) => {
                tracing::error!(fatal = true, error = %err.chain(), "login failed");
                return Err(err);
            }
        };

        let outcome = match self.drive(&token, routine, &mut progress).await {
            Ok(()) => RunOutcome::Completed,
            Err(CarwakeError::Precondition(failed)) => {
                tracing::warn!(stage = %progress.current(), "command cancelled: {}", failed.reason());
                RunOutcome::Cancelled {
                    reason: failed.reason().to_string(),
                }
            }
            Err(err) => {
                let stage = progress.current();
                tracing::error!(%stage, error = %err.chain(), "run aborted");
                RunOutcome::Aborted {
                    stage,
                    error: err.chain(),
                }
            }
        };

        progress.enter(RunStage::LoggingOut);
        tracing::debug!("--------- Logging out ---------");
        let logged_out = match self.api.logout(&token).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err.chain(), "logout failed");
                false
            }
        };
        progress.enter(RunStage::Done);

        Ok(RunReport {
            run_id,
            stages: progress.stages,
            issued: progress.issued,
            outcome,
            logged_out,
        })
    }

    async fn drive(
        &self,
        token: &AuthToken,
        routine: &Routine,
        progress: &mut Progress,
    ) -> Result<(), CarwakeError> {
        let vehicle_id = self.api.fetch_vehicle(token).await?;
        tracing::debug!(%vehicle_id, "vehicle selected");
        let session = Session::new(token.clone(), vehicle_id);

        self.step(&session, &routine.primary, RunStage::ExecutingCommand, progress)
            .await?;

        if let Some(follow_up) = &routine.follow_up {
            progress.enter(RunStage::AwaitingFollowUp);
            tracing::debug!(
                "Waiting {} second(s) before proceeding with {}",
                follow_up.delay.as_secs(),
                follow_up.step.intent
            );
            tokio::time::sleep(follow_up.delay).await;
            self.step(
                &session,
                &follow_up.step,
                RunStage::ExecutingFollowUpCommand,
                progress,
            )
            .await?;
        }

        Ok(())
    }

    /// Wake, gate and execute one step.
    async fn step(
        &self,
        session: &Session,
        step: &Step,
        execute_stage: RunStage,
        progress: &mut Progress,
    ) -> Result<(), CarwakeError> {
        progress.enter(RunStage::WakingVehicle);
        let wake = WakeCoordinator::new(&self.api, self.settings.wake)
            .wake(session)
            .await?;
        if !wake.is_reachable() {
            tracing::warn!(
                attempts = wake.attempts(),
                "vehicle is not online, checking conditions anyway"
            );
        }

        progress.enter(RunStage::CheckingConditions);
        tracing::debug!("Checking required conditions");
        ConditionGate::new(&self.api)
            .check_all(session, &step.conditions)
            .await?;

        progress.enter(execute_stage);
        CommandExecutor::new(&self.api, self.settings.dry_run)
            .execute(session, step.intent)
            .await?;
        progress.issued.push(step.intent);
        Ok(())
    }
}
