use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The only source of randomness used by the generator.
///
/// Every record gets its own ChaCha8 stream keyed by `(seed, record_index)`,
/// so a record's draws never depend on how many values an earlier record
/// consumed. All uniform, categorical, exponential and gaussian draws go
/// through this type.
pub struct TripRng {
    rng: ChaCha8Rng,
}

impl TripRng {
    pub fn for_record(seed: u64, record_index: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(record_index);
        Self { rng }
    }

    /// Uniform draw in `[low, high)`.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    /// Uniform integer in `[0, n)`.
    pub fn index_below(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Draw from any distribution (categorical, exponential, normal).
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.rng)
    }
}
