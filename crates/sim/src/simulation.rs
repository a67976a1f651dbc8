//! The simulation aggregate: one wind field, a particle pool and a fleet.
//!
//! A [`Simulation`] owns everything and is driven by [`Simulation::step`].
//! Time is measured in ticks. Each tick advances particles first, then boats
//! in id order, all against the same read-only wind field.

use glam::DVec2;
use log::{debug, warn};
use zeilrace_core::prng::Xorshift64;
use zeilrace_core::{SimError, WindField, WindSource};
use zeilrace_sailboat::{Boat, BoatControl, SailboatParams};

use crate::config::SimConfig;
use crate::particles::{Particle, ParticlePool};
use crate::snapshot::{BoatSnapshot, ParticleSnapshot};

/// Upper bound on ticks run by a single `step` call. Whole ticks beyond it
/// are dropped.
pub const MAX_TICKS_PER_STEP: u32 = 64;

const PARTICLE_STREAM: u64 = 0;
const BOAT_STREAM: u64 = 1;

/// Mutable agent state. Cloned before a tick so a failed tick can be dropped.
#[derive(Debug, Clone)]
struct Agents {
    particles: ParticlePool,
    boats: Vec<Boat>,
    rng: Xorshift64,
}

impl Agents {
    /// Runs `ticks` ticks on a copy and returns it.
    fn advance<W>(&self, wind: &W, params: &SailboatParams, ticks: u32) -> Result<Self, SimError>
    where
        W: WindSource + ?Sized,
    {
        let mut next = self.clone();
        for _ in 0..ticks {
            next.particles.tick(wind, &mut next.rng)?;
            for boat in &mut next.boats {
                boat.update(wind, params)?;
            }
        }
        Ok(next)
    }
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    wind: WindField,
    agents: Agents,
    accumulator: f64,
    ticks: u64,
}

impl Simulation {
    /// Validates `config`, generates the wind field and spawns every agent.
    ///
    /// Boats get ids `0..boat_count`. Particle and boat placement draw from
    /// separate streams of the seed, so changing the particle count does not
    /// move the boats.
    pub fn configure(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let wind = WindField::generate_with_cell_size(
            config.seed,
            config.world_width,
            config.world_height,
            config.time_param,
            config.cell_size,
        )?;
        let extent = DVec2::new(config.world_width, config.world_height);

        let mut rng = Xorshift64::stream(config.seed, PARTICLE_STREAM);
        let particles = ParticlePool::new(config.particle_count, extent, &mut rng);

        let mut boat_rng = Xorshift64::stream(config.seed, BOAT_STREAM);
        let anchor = config.spawn_anchor();
        let boats = (0..config.boat_count)
            .map(|i| {
                let id = u32::try_from(i)
                    .map_err(|_| SimError::InvalidConfiguration(format!("boat id {i} overflows")))?;
                Ok(Boat::spawn(id, anchor, config.spawn_jitter, &mut boat_rng))
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        debug!(
            "configured {}x{} world seed={} with {} particles and {} boats",
            config.world_width,
            config.world_height,
            config.seed,
            particles.len(),
            boats.len()
        );

        Ok(Self {
            config,
            wind,
            agents: Agents {
                particles,
                boats,
                rng,
            },
            accumulator: 0.0,
            ticks: 0,
        })
    }

    /// Advances by `dt` frame ticks and returns how many whole ticks ran.
    ///
    /// Fractional remainders carry over to the next call. At most
    /// [`MAX_TICKS_PER_STEP`] ticks run per call. On error nothing changes,
    /// including the accumulator.
    pub fn step(&mut self, dt: f64) -> Result<u32, SimError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimestep(dt));
        }
        let pending = self.accumulator + dt;
        let whole = pending.floor();
        let remainder = pending - whole;
        let ticks = if whole > f64::from(MAX_TICKS_PER_STEP) {
            warn!(
                "step of {dt} wants {whole} ticks, running {MAX_TICKS_PER_STEP} and dropping the rest"
            );
            MAX_TICKS_PER_STEP
        } else {
            // In [0, 64], so the cast is exact.
            whole as u32
        };

        self.run(ticks)?;
        self.accumulator = remainder;
        Ok(ticks)
    }

    /// Runs exactly one tick, ignoring the accumulator.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.run(1)
    }

    fn run(&mut self, ticks: u32) -> Result<(), SimError> {
        if ticks == 0 {
            return Ok(());
        }
        self.agents = self
            .agents
            .advance(&self.wind, &self.config.sailboat, ticks)?;
        self.ticks += u64::from(ticks);
        Ok(())
    }

    pub fn particle_snapshot(&self) -> Vec<ParticleSnapshot> {
        self.agents
            .particles
            .particles()
            .iter()
            .map(ParticleSnapshot::from)
            .collect()
    }

    pub fn boat_snapshot(&self) -> Vec<BoatSnapshot> {
        self.agents.boats.iter().map(BoatSnapshot::from).collect()
    }

    /// Sets rudder and sheet for boat `id`.
    pub fn set_boat_control(
        &mut self,
        id: u32,
        rudder: f64,
        sail_angle_bound: f64,
    ) -> Result<(), SimError> {
        let boat = self.boat_mut(id)?;
        boat.set_control(BoatControl::new(rudder, sail_angle_bound)?);
        Ok(())
    }

    /// Teleports boat `id` to a pose and stops it.
    pub fn set_boat_pose(&mut self, id: u32, position: DVec2, heading: f64) -> Result<(), SimError> {
        self.boat_mut(id)?.set_pose(position, heading)
    }

    /// Rebuilds the wind field at a new time parameter. Agents are untouched.
    pub fn regenerate_field(&mut self, time_param: f64) -> Result<(), SimError> {
        self.wind.regenerate(time_param)?;
        self.config.time_param = time_param;
        Ok(())
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks run since `configure`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn boats(&self) -> &[Boat] {
        &self.agents.boats
    }

    pub fn particles(&self) -> &[Particle] {
        self.agents.particles.particles()
    }

    fn boat_mut(&mut self, id: u32) -> Result<&mut Boat, SimError> {
        self.agents
            .boats
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(SimError::UnknownBoat(id))
    }
}
