//! Run stages and the report produced by one invocation.

use std::fmt;

use crate::command::CommandIntent;
use crate::id::RunId;

/// States of the session state machine, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStage {
    LoggingIn,
    WakingVehicle,
    CheckingConditions,
    ExecutingCommand,
    AwaitingFollowUp,
    ExecutingFollowUpCommand,
    LoggingOut,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoggingIn => "logging_in",
            Self::WakingVehicle => "waking_vehicle",
            Self::CheckingConditions => "checking_conditions",
            Self::ExecutingCommand => "executing_command",
            Self::AwaitingFollowUp => "awaiting_follow_up",
            Self::ExecutingFollowUpCommand => "executing_follow_up_command",
            Self::LoggingOut => "logging_out",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a run that got past login ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every planned command was issued.
    Completed,
    /// A precondition did not hold; nothing more was issued.
    Cancelled { reason: String },
    /// A remote call failed, or wake exhaustion was configured as fatal.
    Aborted { stage: RunStage, error: String },
}

impl RunOutcome {
    /// Cancelled runs are expected outcomes, not failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// Trace of what one invocation did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: RunId,
    pub stages: Vec<RunStage>,
    pub issued: Vec<CommandIntent>,
    pub outcome: RunOutcome,
    pub logged_out: bool,
}
