//! Command intents — which remote command a run issues.

use std::fmt;

use serde::Deserialize;

/// The single vehicle command a step issues once its gate passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandIntent {
    StartClimate,
    StopClimate,
    SetSentryMode { enabled: bool },
}

impl fmt::Display for CommandIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartClimate => f.write_str("start_climate"),
            Self::StopClimate => f.write_str("stop_climate"),
            Self::SetSentryMode { enabled } => write!(f, "set_sentry_mode({enabled})"),
        }
    }
}

/// Acknowledgement returned by the remote service for a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandAck {
    pub result: bool,
    #[serde(default)]
    pub reason: String,
}

impl CommandAck {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            result: true,
            reason: String::new(),
        }
    }
}
