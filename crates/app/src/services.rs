//! Application services — the stages of the command pipeline.
//!
//! Each service borrows a [`VehicleApi`](crate::ports::VehicleApi)
//! implementation (constructor injection), keeping this layer decoupled from
//! concrete adapters.

pub mod command_executor;
pub mod condition_gate;
pub mod wake_coordinator;
