//! Strata - entity transform hierarchy with physics sync
//!
//! The application layer: configuration loading and the fixed-timestep
//! simulation driver. The scene graph itself lives in `strata_core`.

pub mod config;
pub mod systems;
