//! # carwake — remote vehicle command runner
//!
//! Composition root that wires one adapter into the session runner and runs
//! a single routine.
//!
//! ## Responsibilities
//! - Parse the command line (`climate` or `sentry`, plus global flags)
//! - Load configuration (file, env vars, flags) and install logging
//! - Build the selected `VehicleApi` backend (owner API or virtual)
//! - Run the routine and translate the result into an exit code
//!
//! ## Exit codes
//! - `0` the run went through, including cancelled or aborted runs
//! - `1` login failed
//! - `2` configuration or logging setup failed
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;
mod logging;

use std::process::ExitCode;

use carwake_adapter_owner_api::OwnerApiClient;
use carwake_adapter_virtual::VirtualVehicle;
use carwake_app::ports::VehicleApi;
use carwake_app::session_runner::{RunnerSettings, SessionRunner};
use carwake_domain::error::render_chain;
use carwake_domain::routine::Routine;
use carwake_domain::session::Credentials;
use clap::Parser;

use crate::cli::Cli;
use crate::config::{Backend, Config};

const EXIT_LOGIN_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref(), cli.backend, cli.dry_run) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("carwake: {}", render_chain(&err));
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Err(err) = logging::init(&config.logging, config.dry_run) {
        eprintln!("carwake: {}", render_chain(&err));
        return ExitCode::from(EXIT_CONFIG);
    }
    let settings = match config.runner_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %render_chain(&err), "invalid configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let routine = config.routine(cli.command);
    let credentials = config.credentials();
    tracing::info!(
        routine = routine.name,
        backend = ?config.backend,
        dry_run = config.dry_run,
        "starting carwake {}",
        env!("CARGO_PKG_VERSION")
    );

    match config.backend {
        Backend::OwnerApi => match OwnerApiClient::new(config.owner_api.clone()) {
            Ok(client) => execute(client, settings, &credentials, &routine).await,
            Err(err) => {
                tracing::error!(error = %render_chain(&err), "unable to build the HTTP client");
                ExitCode::from(EXIT_LOGIN_FAILED)
            }
        },
        Backend::Virtual => {
            let vehicle = VirtualVehicle::new(config.virtual_vehicle.clone());
            execute(vehicle, settings, &credentials, &routine).await
        }
    }
}

async fn execute<V: VehicleApi>(
    api: V,
    settings: RunnerSettings,
    credentials: &Credentials,
    routine: &Routine,
) -> ExitCode {
    let runner = SessionRunner::new(api, settings);
    match runner.run(credentials, routine).await {
        Ok(report) => {
            tracing::info!(
                run_id = %report.run_id,
                outcome = ?report.outcome,
                issued = ?report.issued,
                logged_out = report.logged_out,
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::from(EXIT_LOGIN_FAILED),
    }
}
