//! Point-in-time, read-only views of agents for hosts to paint.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use zeilrace_sailboat::{Boat, BoatState};

use crate::particles::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub position: DVec2,
    pub life: f64,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position,
            life: p.life,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatSnapshot {
    pub id: u32,
    pub position: DVec2,
    pub heading: f64,
    pub sail_angle: f64,
    pub sheet_tight: bool,
    pub state: BoatState,
}

impl From<&Boat> for BoatSnapshot {
    fn from(b: &Boat) -> Self {
        Self {
            id: b.id(),
            position: b.position(),
            heading: b.heading(),
            sail_angle: b.sail_angle(),
            sheet_tight: b.sheet_tight(),
            state: b.state(),
        }
    }
}
