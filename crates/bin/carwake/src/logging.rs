//! Subscriber setup.
//!
//! Installed once, before anything else runs. A bare level name in the
//! configured filter applies to every carwake crate; anything else is used
//! as an `EnvFilter` directive as-is.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::config::LoggingConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DRY_RUN_FILTER: &str = "carwake=debug";

/// Logging setup errors.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to open log file {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install the log subscriber")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Translate a level name into a directive scoped to carwake.
///
/// `fatal` has no tracing counterpart and maps to `error`.
fn directive(filter: &str) -> String {
    let level = match filter.trim().to_ascii_lowercase().as_str() {
        "fatal" | "error" => "error",
        "warn" | "warning" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        "off" => "off",
        _ => return filter.to_string(),
    };
    format!("carwake={level}")
}

fn build_filter(filter: &str) -> Result<EnvFilter, LoggingError> {
    let directive = directive(filter);
    EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter {
        filter: directive,
        source,
    })
}

/// Install the global subscriber.
///
/// Dry runs always log at debug level to stderr, whatever the configuration
/// says.
///
/// # Errors
///
/// Returns an error if the filter does not parse, the log file cannot be
/// opened, or a subscriber is already installed.
pub fn init(config: &LoggingConfig, dry_run: bool) -> Result<(), LoggingError> {
    let (filter, file) = if dry_run {
        (build_filter(DRY_RUN_FILTER)?, None)
    } else {
        (build_filter(&config.filter)?, config.file.as_ref())
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(true);

    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(LoggingError::Install)
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(LoggingError::Install),
    }
}
