//! The wind field: a fixed-resolution two-channel grid sampled by agents.
//!
//! [`WindField`] is generated once from [`NoiseField`] and then read-only.
//! Each cell holds a horizontal and a vertical channel in [0, 1]; a sample
//! maps both channels to a velocity in [-4, 4] per axis.
//!
//! Agents depend on the [`WindSource`] trait rather than on `WindField`
//! directly, so dynamics can be driven by a [`UniformWind`] in calm-water
//! runs and tests.

use glam::DVec2;
use log::debug;

use crate::error::SimError;
use crate::field::{Field, MAX_CELLS};
use crate::noise_field::NoiseField;
use crate::prng::noise_seed;

/// Agents closer than this to any world edge are expired (particles) or sunk
/// (boats).
pub const EDGE_MARGIN: f64 = 15.0;

/// Noise-space units per world unit.
pub const NOISE_SCALE: f64 = 1.0 / 500.0;

/// Noise-space offset between the horizontal and vertical channels.
pub const CHANNEL_OFFSET: f64 = 1000.0;

/// Largest wind speed per axis, in world units per tick.
pub const MAX_AXIS_SPEED: f64 = 4.0;

/// Maps a channel value in [0, 1] to a velocity component in [-4, 4].
///
/// The channel is read as an 8-bit intensity (`* 255`) and scaled down by
/// 32, so the usable range is [-4, 3.97].
pub fn channel_to_velocity(channel: f64) -> f64 {
    channel * 255.0 / 32.0 - MAX_AXIS_SPEED
}

/// True when `position` lies within [`EDGE_MARGIN`] of any edge of a world
/// with the given `extent`. Non-finite positions count as near the edge.
pub fn near_edge(position: DVec2, extent: DVec2) -> bool {
    let inside_x = position.x >= EDGE_MARGIN && position.x <= extent.x - EDGE_MARGIN;
    let inside_y = position.y >= EDGE_MARGIN && position.y <= extent.y - EDGE_MARGIN;
    !(inside_x && inside_y)
}

/// Grid columns and rows needed to cover `width x height` at `cell_size`.
///
/// Fails when the grid would exceed [`MAX_CELLS`], so oversized worlds are
/// refused before anything is allocated. Inputs must already be positive
/// and finite.
pub fn grid_dims(width: f64, height: f64, cell_size: f64) -> Result<(usize, usize), SimError> {
    let cols = (width / cell_size).ceil();
    let rows = (height / cell_size).ceil();
    if cols * rows > MAX_CELLS as f64 {
        return Err(SimError::InvalidConfiguration(format!(
            "a {width}x{height} world at cell size {cell_size} needs {cols}x{rows} cells, \
             more than the limit of {MAX_CELLS}"
        )));
    }
    // Bounded by MAX_CELLS, so the casts are exact.
    Ok((cols as usize, rows as usize))
}

/// Rejects positions outside `[0, extent.x) x [0, extent.y)`.
fn check_bounds(position: DVec2, extent: DVec2) -> Result<(), SimError> {
    let in_x = position.x >= 0.0 && position.x < extent.x;
    let in_y = position.y >= 0.0 && position.y < extent.y;
    if in_x && in_y {
        Ok(())
    } else {
        Err(SimError::OutOfBounds {
            x: position.x,
            y: position.y,
            width: extent.x,
            height: extent.y,
        })
    }
}

/// A source of world-frame wind velocity.
///
/// Implementations must be deterministic and side-effect free: sampling the
/// same position twice yields the same vector.
pub trait WindSource: Send + Sync {
    /// World size `(width, height)` covered by the source.
    fn extent(&self) -> DVec2;

    /// Wind velocity at `position`, or `OutOfBounds` outside the extent.
    fn velocity(&self, position: DVec2) -> Result<DVec2, SimError>;
}

/// Grid-backed wind generated from seeded noise.
#[derive(Debug, Clone)]
pub struct WindField {
    seed: u64,
    time_param: f64,
    extent: DVec2,
    cell_size: f64,
    noise: NoiseField,
    hor: Field,
    ver: Field,
}

impl WindField {
    /// Generates a field covering `width x height` world units, one cell per
    /// world unit.
    pub fn generate(seed: u64, width: f64, height: f64, time_param: f64) -> Result<Self, SimError> {
        Self::generate_with_cell_size(seed, width, height, time_param, 1.0)
    }

    /// Generates a field with `cell_size` world units per grid cell.
    pub fn generate_with_cell_size(
        seed: u64,
        width: f64,
        height: f64,
        time_param: f64,
        cell_size: f64,
    ) -> Result<Self, SimError> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "world dimensions must be positive and finite, got {width}x{height}"
            )));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "cell size must be positive and finite, got {cell_size}"
            )));
        }
        if !time_param.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "time parameter must be finite, got {time_param}"
            )));
        }

        let (cols, rows) = grid_dims(width, height, cell_size)?;
        let noise = NoiseField::new(noise_seed(seed));
        let (hor, ver) = build_channels(&noise, cols, rows, cell_size, time_param)?;
        debug!(
            "generated wind field seed={seed} {cols}x{rows} cells (cell size {cell_size}, t={time_param})"
        );

        Ok(Self {
            seed,
            time_param,
            extent: DVec2::new(width, height),
            cell_size,
            noise,
            hor,
            ver,
        })
    }

    /// Rebuilds both channels in place for a new time parameter.
    ///
    /// The seed, extent and resolution are kept. Regenerating with the same
    /// time parameter reproduces the same grid bit for bit.
    pub fn regenerate(&mut self, time_param: f64) -> Result<(), SimError> {
        if !time_param.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "time parameter must be finite, got {time_param}"
            )));
        }
        let (hor, ver) = build_channels(
            &self.noise,
            self.hor.width(),
            self.hor.height(),
            self.cell_size,
            time_param,
        )?;
        self.hor = hor;
        self.ver = ver;
        self.time_param = time_param;
        debug!("regenerated wind field seed={} at t={time_param}", self.seed);
        Ok(())
    }

    /// Wind velocity at the continuous world coordinate `(x, y)`.
    ///
    /// Rounds to the nearest cell. Fails with `OutOfBounds` when
    /// `x < 0 || x >= width || y < 0 || y >= height`.
    pub fn sample_velocity(&self, x: f64, y: f64) -> Result<DVec2, SimError> {
        let position = DVec2::new(x, y);
        check_bounds(position, self.extent)?;
        let cx = x / self.cell_size;
        let cy = y / self.cell_size;
        Ok(DVec2::new(
            channel_to_velocity(self.hor.nearest(cx, cy)),
            channel_to_velocity(self.ver.nearest(cx, cy)),
        ))
    }

    /// Horizontal channel, values in [0, 1].
    pub fn hor(&self) -> &Field {
        &self.hor
    }

    /// Vertical channel, values in [0, 1].
    pub fn ver(&self) -> &Field {
        &self.ver
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn time_param(&self) -> f64 {
        self.time_param
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// World width covered by the field.
    pub fn width(&self) -> f64 {
        self.extent.x
    }

    /// World height covered by the field.
    pub fn height(&self) -> f64 {
        self.extent.y
    }
}

impl WindSource for WindField {
    fn extent(&self) -> DVec2 {
        self.extent
    }

    fn velocity(&self, position: DVec2) -> Result<DVec2, SimError> {
        self.sample_velocity(position.x, position.y)
    }
}

/// Samples both channels for every cell.
fn build_channels(
    noise: &NoiseField,
    cols: usize,
    rows: usize,
    cell_size: f64,
    t: f64,
) -> Result<(Field, Field), SimError> {
    let noise_coord = |x: usize, y: usize| {
        (
            x as f64 * cell_size * NOISE_SCALE,
            y as f64 * cell_size * NOISE_SCALE,
        )
    };
    let hor = Field::from_fn(cols, rows, |x, y| {
        let (nx, ny) = noise_coord(x, y);
        noise.sample_at(nx, ny, t)
    })?;
    let ver = Field::from_fn(cols, rows, |x, y| {
        let (nx, ny) = noise_coord(x, y);
        noise.sample_at(nx + CHANNEL_OFFSET, ny + CHANNEL_OFFSET, t)
    })?;
    Ok((hor, ver))
}

/// Spatially constant wind over a bounded world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformWind {
    pub extent: DVec2,
    pub velocity: DVec2,
}

impl UniformWind {
    /// Zero wind everywhere.
    pub fn calm(width: f64, height: f64) -> Self {
        Self {
            extent: DVec2::new(width, height),
            velocity: DVec2::ZERO,
        }
    }
}

impl WindSource for UniformWind {
    fn extent(&self) -> DVec2 {
        self.extent
    }

    fn velocity(&self, position: DVec2) -> Result<DVec2, SimError> {
        check_bounds(position, self.extent)?;
        Ok(self.velocity)
    }
}
