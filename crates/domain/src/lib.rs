//! # carwake-domain
//!
//! Pure domain model for the carwake vehicle automation client.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Credentials** and the authenticated **Session**
//! - Define **Vehicle snapshots** (occupancy, battery level) and wake states
//! - Define **Conditions** (safety predicates evaluated against a snapshot)
//! - Define **Command intents** and **Routines** (command → optional follow-up)
//! - Define the **run stages** and the report of one invocation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod command;
pub mod condition;
pub mod routine;
pub mod run;
pub mod session;
pub mod vehicle;
pub mod wake;
