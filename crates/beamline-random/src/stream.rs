//! Counter-based per-event random streams and the primitive variates.

use std::f64::consts::PI;

use beamline_core::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed for one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunSeed(pub u64);

/// Factory for per-event streams. Built once per run, shared by workers.
///
/// The key is derived from the run seed; each event index selects an
/// independent ChaCha stream starting at word position zero.
#[derive(Clone, Debug)]
pub struct EventStreams {
    seed: RunSeed,
    base: ChaCha8Rng,
}

impl EventStreams {
    /// Create the stream factory for a run.
    pub fn new(seed: RunSeed) -> Self {
        Self {
            seed,
            base: ChaCha8Rng::seed_from_u64(seed.0),
        }
    }

    /// The run seed.
    pub fn seed(&self) -> RunSeed {
        self.seed
    }

    /// The random stream for event `event_index`.
    pub fn for_event(&self, event_index: u64) -> EventRng {
        let mut rng = self.base.clone();
        rng.set_stream(event_index);
        rng.set_word_pos(0);
        EventRng { rng, event_index }
    }
}

/// Random stream owned by one event for the length of its pipeline pass.
#[derive(Clone, Debug)]
pub struct EventRng {
    rng: ChaCha8Rng,
    event_index: u64,
}

impl EventRng {
    /// Shorthand for `EventStreams::new(seed).for_event(event_index)`.
    ///
    /// Prefer a shared [`EventStreams`] in hot loops; this re-derives the key.
    pub fn new(seed: RunSeed, event_index: u64) -> Self {
        EventStreams::new(seed).for_event(event_index)
    }

    /// The event this stream belongs to.
    pub fn event_index(&self) -> u64 {
        self.event_index
    }

    /// Number of 32-bit words consumed so far.
    pub fn draw_index(&self) -> u128 {
        self.rng.get_word_pos()
    }

    /// Uniform on `[0, 1)`.
    #[inline]
    pub fn uniform01(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Uniform on `[-1, 1)`.
    #[inline]
    pub fn uniform_pm1(&mut self) -> f64 {
        2.0 * self.uniform01() - 1.0
    }

    /// Uniform on `[lo, hi)`. Returns `lo` when the range is empty.
    #[inline]
    pub fn uniform_range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.uniform01()
    }

    /// Standard normal deviate (Box-Muller transform).
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - U lies in (0, 1], so the log is finite.
        let u1 = 1.0 - self.uniform01();
        let u2 = self.uniform01();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Normal deviate with the given mean and standard deviation.
    pub fn gaussian(&mut self, mean: f64, sigma: f64) -> f64 {
        mean + sigma * self.standard_normal()
    }

    /// Unit vector uniformly distributed over the sphere.
    pub fn isotropic_direction(&mut self) -> Vec3 {
        let cos_theta = self.uniform_pm1();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * self.uniform01();
        Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
    }

    /// Point uniformly distributed over a disk of `radius` in the xy plane.
    pub fn uniform_disk(&mut self, radius: f64) -> (f64, f64) {
        let r = radius * self.uniform01().sqrt();
        let phi = 2.0 * PI * self.uniform01();
        (r * phi.cos(), r * phi.sin())
    }
}
