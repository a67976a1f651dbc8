//! Tracer particles advected by the wind.
//!
//! Particles are massless: one unit of wind moves a particle one world unit
//! per tick. Each carries a countdown so the pool keeps churning instead of
//! piling up in convergence zones, and any particle that drifts into the
//! edge margin is recycled in place.

use glam::DVec2;
use zeilrace_core::prng::Xorshift64;
use zeilrace_core::wind::near_edge;
use zeilrace_core::{SimError, WindSource};

/// Life given to a freshly respawned particle.
pub const MAX_LIFE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub life: f64,
}

impl Particle {
    /// Moves the particle to a uniform random point of the world and resets
    /// its life to [`MAX_LIFE`].
    pub fn respawn(&mut self, extent: DVec2, rng: &mut Xorshift64) {
        self.position = rng.next_point(extent.x, extent.y);
        self.life = MAX_LIFE;
    }

    /// True when the particle is out of life or inside the edge margin.
    pub fn is_expired(&self, extent: DVec2) -> bool {
        self.life < 0.0 || near_edge(self.position, extent)
    }

    /// Ages the particle by one tick and advects it.
    ///
    /// An expired particle respawns and does not move this tick. A failed
    /// wind sample leaves the particle unchanged.
    pub fn tick<W>(&mut self, wind: &W, rng: &mut Xorshift64) -> Result<(), SimError>
    where
        W: WindSource + ?Sized,
    {
        let extent = wind.extent();
        let aged = Particle {
            position: self.position,
            life: self.life - 1.0,
        };
        if aged.is_expired(extent) {
            self.respawn(extent, rng);
            return Ok(());
        }
        let velocity = wind.velocity(aged.position)?;
        self.position = aged.position + velocity;
        self.life = aged.life;
        Ok(())
    }
}

/// Fixed-size pool of tracer particles over one world.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    /// Scatters `count` particles over the world.
    ///
    /// Initial lives are drawn uniformly from [0, MAX_LIFE) so the pool does
    /// not respawn in lock-step.
    pub fn new(count: usize, extent: DVec2, rng: &mut Xorshift64) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                position: rng.next_point(extent.x, extent.y),
                life: rng.next_range(0.0, MAX_LIFE),
            })
            .collect();
        Self { particles }
    }

    /// Ticks every particle in slot order.
    pub fn tick<W>(&mut self, wind: &W, rng: &mut Xorshift64) -> Result<(), SimError>
    where
        W: WindSource + ?Sized,
    {
        self.particles
            .iter_mut()
            .try_for_each(|particle| particle.tick(wind, rng))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
