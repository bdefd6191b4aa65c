//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Backend;

/// Wake the car, check it is safe, send one command, log out.
#[derive(Debug, Parser)]
#[command(name = "carwake", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to `carwake.toml` in the working directory)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Flash the lights instead of sending the real command
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Vehicle backend, overriding the configuration file
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Command,
}

/// Routine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start climate control, then stop it once the configured time is up
    Climate,
    /// Enable sentry mode
    Sentry,
}
