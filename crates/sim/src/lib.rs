#![deny(unsafe_code)]
//! The zeilrace simulation aggregate.
//!
//! Ties a generated wind field to a pool of tracer particles and a fleet of
//! sailboats, and advances them together in fixed ticks. Everything is
//! deterministic for a given [`SimConfig`].

pub mod config;
pub mod particles;
pub mod simulation;
pub mod snapshot;

pub use config::SimConfig;
pub use particles::{Particle, ParticlePool, MAX_LIFE};
pub use simulation::{Simulation, MAX_TICKS_PER_STEP};
pub use snapshot::{BoatSnapshot, ParticleSnapshot};
