//! Simulation configuration.
//!
//! [`SimConfig`] is built from code, from a JSON params object, or from a
//! replayable [`Scenario`]. JSON lookups are lenient (unknown or mistyped
//! keys fall back to defaults); [`SimConfig::validate`] is strict.

use glam::DVec2;
use serde_json::Value;
use zeilrace_core::params::{param_f64, param_u64, param_usize, param_vec2};
use zeilrace_core::vector::is_finite;
use zeilrace_core::wind::grid_dims;
use zeilrace_core::{Scenario, SimError};
use zeilrace_sailboat::SailboatParams;

/// Default half-width of the square boats are scattered over at spawn.
pub const DEFAULT_SPAWN_JITTER: f64 = 50.0;
/// Default world units per wind grid cell.
pub const DEFAULT_CELL_SIZE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub world_width: f64,
    pub world_height: f64,
    pub particle_count: usize,
    pub boat_count: usize,
    pub seed: u64,
    /// Third noise coordinate used when generating the wind field.
    pub time_param: f64,
    pub cell_size: f64,
    /// Where boats are placed. `None` means a quarter of the way across,
    /// halfway down.
    pub boat_spawn: Option<DVec2>,
    pub spawn_jitter: f64,
    pub sailboat: SailboatParams,
}

impl SimConfig {
    /// A config with default field resolution, spawn and boat tuning.
    pub fn new(
        world_width: f64,
        world_height: f64,
        particle_count: usize,
        boat_count: usize,
        seed: u64,
    ) -> Self {
        Self {
            world_width,
            world_height,
            particle_count,
            boat_count,
            seed,
            time_param: 0.0,
            cell_size: DEFAULT_CELL_SIZE,
            boat_spawn: None,
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            sailboat: SailboatParams::default(),
        }
    }

    /// Reads a full configuration from one flat JSON object.
    ///
    /// Recognised keys: `world_width`, `world_height`, `particles`, `boats`,
    /// `seed`, `time_param`, `cell_size`, `boat_spawn`, `spawn_jitter` and
    /// the sailboat coefficients.
    pub fn from_json(params: &Value) -> Self {
        let mut config = Self::new(
            param_f64(params, "world_width", 1200.0),
            param_f64(params, "world_height", 800.0),
            param_usize(params, "particles", 1000),
            param_usize(params, "boats", 3),
            param_u64(params, "seed", 42),
        );
        config.time_param = param_f64(params, "time_param", 0.0);
        config.apply_overrides(params);
        config
    }

    /// Builds the configuration a scenario describes.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, SimError> {
        scenario.validate()?;
        let mut config = Self::new(
            scenario.world_width,
            scenario.world_height,
            scenario.particles,
            scenario.boats,
            scenario.seed,
        );
        config.time_param = scenario.time_param;
        config.apply_overrides(&scenario.params);
        Ok(config)
    }

    /// Reads the keys shared by JSON configs and scenario params.
    fn apply_overrides(&mut self, params: &Value) {
        self.cell_size = param_f64(params, "cell_size", self.cell_size);
        if params.get("boat_spawn").is_some() {
            self.boat_spawn = Some(param_vec2(params, "boat_spawn", self.spawn_anchor()));
        }
        self.spawn_jitter = param_f64(params, "spawn_jitter", self.spawn_jitter);
        self.sailboat = SailboatParams::from_json(params);
    }

    /// The point boats are scattered around.
    pub fn spawn_anchor(&self) -> DVec2 {
        self.boat_spawn
            .unwrap_or_else(|| DVec2::new(self.world_width / 4.0, self.world_height / 2.0))
    }

    /// Rejects configurations the kernel cannot run.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.world_width) || !positive(self.world_height) {
            return invalid(format!(
                "world dimensions must be positive and finite, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        if !positive(self.cell_size) {
            return invalid(format!(
                "cell size must be positive and finite, got {}",
                self.cell_size
            ));
        }
        grid_dims(self.world_width, self.world_height, self.cell_size)?;
        if !self.time_param.is_finite() {
            return invalid(format!("time parameter must be finite, got {}", self.time_param));
        }
        if !(self.spawn_jitter.is_finite() && self.spawn_jitter >= 0.0) {
            return invalid(format!(
                "spawn jitter must be finite and non-negative, got {}",
                self.spawn_jitter
            ));
        }
        if !is_finite(self.spawn_anchor()) {
            return invalid(format!("boat spawn must be finite, got {:?}", self.boat_spawn));
        }
        if u32::try_from(self.boat_count).is_err() {
            return invalid(format!("too many boats: {}", self.boat_count));
        }
        Ok(())
    }
}
