//! Application systems
//!
//! Systems that drive a [`strata_core::World`] from the application loop.

mod simulation;

pub use simulation::{SimulationResult, SimulationSystem};
