//! Two-dimensional scalar grid with clamped values and clamped addressing.
//!
//! A `Field` stores `width * height` f64 values in the range [0, 1] using
//! row-major layout. Unlike a toroidal grid, coordinates past an edge resolve
//! to the nearest edge cell: the wind field is a bounded world, not a torus.

use rayon::prelude::*;

use crate::error::SimError;

/// Largest grid accepted, in cells.
pub const MAX_CELLS: usize = 1 << 26;

/// A 2D scalar grid with values clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

/// Validates grid dimensions and returns the cell count.
fn cell_count(width: usize, height: usize) -> Result<usize, SimError> {
    if width == 0 || height == 0 {
        return Err(SimError::InvalidConfiguration(format!(
            "grid dimensions must be non-zero, got {width}x{height}"
        )));
    }
    match width.checked_mul(height) {
        Some(len) if len <= MAX_CELLS => Ok(len),
        _ => Err(SimError::InvalidConfiguration(format!(
            "grid of {width}x{height} cells exceeds the limit of {MAX_CELLS}"
        ))),
    }
}

impl Field {
    /// Builds a field by evaluating `f(x, y)` for every cell.
    ///
    /// Rows are filled in parallel. Every cell is computed independently, so
    /// the result is identical to a sequential fill.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self, SimError>
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let len = cell_count(width, height)?;
        let mut data = vec![0.0; len];
        data.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y).clamp(0.0, 1.0);
                }
            });
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y.min(self.height - 1) * self.width + x.min(self.width - 1)
    }

    /// Gets the value at `(x, y)`; indices past an edge resolve to the edge.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Value of the cell nearest to the continuous coordinate `(x, y)`.
    ///
    /// Coordinates are rounded, then clamped into the grid, so any finite
    /// input resolves to some cell. Bounds policy belongs to the caller.
    pub fn nearest(&self, x: f64, y: f64) -> f64 {
        let xi = x.round().max(0.0) as usize;
        let yi = y.round().max(0.0) as usize;
        self.get(xi, yi)
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}
