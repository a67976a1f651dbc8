//! Deterministic scalar noise in [0, 1].
//!
//! Wraps fractal Perlin noise from the `noise` crate. Four octaves with
//! persistence 0.5 give the soft, large-scale structure the wind field
//! needs; the raw [-1, 1] output is remapped to [0, 1].

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Default octave count.
pub const DEFAULT_OCTAVES: usize = 4;
/// Amplitude falloff between octaves.
pub const DEFAULT_PERSISTENCE: f64 = 0.5;

/// Seeded fractal noise source.
#[derive(Debug, Clone)]
pub struct NoiseField {
    fbm: Fbm<Perlin>,
}

impl NoiseField {
    /// Creates a noise source with the default octave settings.
    pub fn new(seed: u32) -> Self {
        Self::with_octaves(seed, DEFAULT_OCTAVES)
    }

    /// Creates a noise source with `octaves` layers (at least one).
    pub fn with_octaves(seed: u32, octaves: usize) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves.max(1))
            .set_persistence(DEFAULT_PERSISTENCE);
        Self { fbm }
    }

    /// Static 2D sample at noise-space coordinates `(x, y)`.
    ///
    /// This is the `t = 0` slice of [`NoiseField::sample_at`].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.sample_at(x, y, 0.0)
    }

    /// Time-varying sample: `t` moves through the third noise dimension.
    pub fn sample_at(&self, x: f64, y: f64, t: f64) -> f64 {
        let raw = self.fbm.get([x, y, t]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
