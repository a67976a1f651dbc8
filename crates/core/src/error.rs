//! Error types for the zeilrace kernel.

use thiserror::Error;

/// Errors produced by kernel operations.
///
/// Every variant is recoverable: a call that returns one of these leaves the
/// simulation exactly as it was before the call.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// A wind query fell outside the field extent.
    #[error("position ({x}, {y}) out of bounds for field of size ({width}, {height})")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// `step` was called with a non-positive or non-finite timestep.
    #[error("invalid timestep {0}: dt must be positive and finite")]
    InvalidTimestep(f64),

    /// World dimensions, cell size or counts were rejected at configure time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No boat with the given id exists.
    #[error("unknown boat id {0}")]
    UnknownBoat(u32),

    /// The boat has sunk and no longer accepts pose changes.
    #[error("boat {0} has sunk")]
    BoatSunk(u32),

    /// A rudder or sheet value was rejected.
    #[error("invalid control input: {0}")]
    InvalidControl(String),
}
