//! Deterministic random number generation.
//!
//! Used for placeholder card data (player/like counts) and for session
//! nonces that keep identifiers and locators distinct across sessions.
//!
//! ## Determinism
//!
//! Same seed produces an identical sequence, which is what the tests rely
//! on. Production sessions seed from entropy.
//!
//! ```
//! use gallery_engine::core::GalleryRng;
//!
//! let mut a = GalleryRng::new(42);
//! let mut b = GalleryRng::new(42);
//! assert_eq!(a.gen_range(0u32..100), b.gen_range(0u32..100));
//! ```

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for the gallery session.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct GalleryRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GalleryRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Get the seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a value in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// Generate a raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
