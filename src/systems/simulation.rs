//! Simulation system
//!
//! Turns variable frame times into fixed-size ticks of [`World::update`]:
//! - frame time measurement
//! - capping long frames
//! - accumulating leftover time between frames

use std::time::Instant;

use strata_core::{ContactListener, SceneError, SyncStats, World};

use crate::config::SimulationConfig;

/// Result of a simulation update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationResult {
    /// Number of fixed ticks run this frame
    pub ticks: u32,
    /// Fraction of a tick left in the accumulator, for interpolation
    pub alpha: f32,
    /// Bridge counters from the last tick run, if any
    pub last_stats: SyncStats,
}

/// Fixed-timestep driver for a [`World`]
pub struct SimulationSystem {
    timestep: f32,
    max_frame_time: f32,
    accumulator: f32,
    total_ticks: u64,
    last_frame: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    ///
    /// A config that fails [`SimulationConfig::validate`] is not fatal here:
    /// a bad timestep falls back to the default and a bad frame cap to zero.
    pub fn new(config: &SimulationConfig) -> Self {
        let timestep = if config.timestep.is_finite() && config.timestep > 0.0 {
            config.timestep
        } else {
            let fallback = SimulationConfig::default().timestep;
            log::warn!("timestep {}s is not positive, using {}s", config.timestep, fallback);
            fallback
        };
        let max_frame_time = if config.max_frame_time >= 0.0 {
            config.max_frame_time
        } else {
            log::warn!("max_frame_time {}s is negative, using 0s", config.max_frame_time);
            0.0
        };

        Self {
            timestep,
            max_frame_time,
            accumulator: 0.0,
            total_ticks: 0,
            last_frame: Instant::now(),
        }
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Ticks run since construction
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Run one frame using wall-clock time since the previous call
    pub fn update<L>(&mut self, world: &mut World, listener: &mut L) -> Result<SimulationResult, SceneError>
    where
        L: ContactListener + ?Sized,
    {
        let now = Instant::now();
        let frame_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(world, frame_time, listener)
    }

    /// Run as many fixed ticks as `frame_time` (plus leftover time) covers
    ///
    /// Frame time is capped to `max_frame_time` so a long stall does not
    /// trigger a burst of catch-up ticks.
    pub fn advance<L>(
        &mut self,
        world: &mut World,
        frame_time: f32,
        listener: &mut L,
    ) -> Result<SimulationResult, SceneError>
    where
        L: ContactListener + ?Sized,
    {
        if frame_time > self.max_frame_time {
            log::debug!("frame time {}s capped at {}s", frame_time, self.max_frame_time);
        }
        self.accumulator += frame_time.clamp(0.0, self.max_frame_time);

        let mut result = SimulationResult::default();
        while self.accumulator >= self.timestep {
            result.last_stats = world.update(self.timestep, listener)?;
            self.accumulator -= self.timestep;
            self.total_ticks += 1;
            result.ticks += 1;
        }

        result.alpha = self.accumulator / self.timestep;
        Ok(result)
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
