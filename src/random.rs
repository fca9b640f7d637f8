//! Random integer source consumed by the shuffle pass

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed unsigned integers
///
/// Every [`RngCore`] implements this trait, so any `rand` generator can be injected.
pub trait RandomSource {
    /// Next uniformly distributed value
    fn next(&mut self) -> u32;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn next(&mut self) -> u32 {
        self.next_u32()
    }
}

/// Deterministic ChaCha8 source for `seed`
pub fn seeded_source(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
