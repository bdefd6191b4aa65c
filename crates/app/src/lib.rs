//! # carwake-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters must implement (driven/outbound port):
//!   - `VehicleApi` — login, wake, telemetry fetch, commands, logout
//! - Define the use-cases that drive one invocation:
//!   - `WakeCoordinator` — bounded wake-up retry loop
//!   - `ConditionGate` — one telemetry fetch, ordered condition evaluation
//!   - `CommandExecutor` — one-shot command dispatch (or dry-run substitute)
//!   - `SessionRunner` — login → wake → gate → execute → follow-up → logout
//! - Orchestrate domain objects without knowing *how* the vehicle is reached
//!
//! ## Dependency rule
//! Depends on `carwake-domain` only (plus `tokio::time` for delays).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod session_runner;

#[cfg(test)]
mod fakes;
