#![deny(unsafe_code)]
//! Core types for the zeilrace wind and sailboat simulation.
//!
//! Provides the `SimError` type, the `Field` scalar grid, seeded `NoiseField`,
//! the `WindField` grid with its `WindSource` sampling seam, the `Xorshift64`
//! PRNG, vector helpers, parameter helpers and the replayable `Scenario`.

pub mod error;
pub mod field;
pub mod noise_field;
pub mod params;
pub mod prng;
pub mod scenario;
pub mod vector;
pub mod wind;

pub use error::SimError;
pub use field::Field;
pub use noise_field::NoiseField;
pub use prng::Xorshift64;
pub use scenario::Scenario;
pub use vector::Vector2;
pub use wind::{UniformWind, WindField, WindSource, EDGE_MARGIN};
