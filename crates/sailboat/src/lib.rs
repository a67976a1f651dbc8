#![deny(unsafe_code)]
//! Sailboat dynamics for zeilrace.
//!
//! A boat converts sampled wind, its own orientation and sail trim into
//! acceleration and heading change. The sail swings freely under wind
//! pressure until the sheet catches it. A tight sheet transmits force and a
//! little torque to the hull. Rudder authority grows with speed, and heavy
//! per-tick drag keeps everything bounded. Boats that reach the edge of the world sink and stay sunk.

pub mod boat;
pub mod params;

pub use boat::{sail_force, Boat, BoatControl, BoatState, DEFAULT_SAIL_ANGLE_BOUND};
pub use params::SailboatParams;
