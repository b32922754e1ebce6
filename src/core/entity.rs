//! Identifier generation for gallery records.
//!
//! Every published game card has a unique `GameId`. Identifiers are opaque:
//! nothing in the engine interprets them beyond equality and hashing.
//!
//! ## Uniqueness
//!
//! `IdGen` mixes a random per-session nonce with a monotonic counter through
//! a bijective multiply-xor step. Within a session uniqueness is guaranteed
//! by the counter; across sessions the nonce makes collisions negligible.
//!
//! ```
//! use gallery_engine::core::IdGen;
//!
//! let mut ids = IdGen::new(42);
//! let a = ids.next_game();
//! let b = ids.next_game();
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};

use super::rng::GalleryRng;

/// Unique identifier for a published game card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a game ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({:016x})", self.0)
    }
}

/// Generator for unique opaque identifiers.
///
/// Counter values are passed through a multiply-xor bijection, so distinct
/// counters always yield distinct IDs within a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdGen {
    nonce: u64,
    counter: u64,
}

impl IdGen {
    /// Create a generator with a seed-derived session nonce.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = GalleryRng::new(seed);
        Self {
            nonce: rng.next_u64(),
            counter: 0,
        }
    }

    /// Create a generator seeded from system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            nonce: rand::random::<u64>(),
            counter: 0,
        }
    }

    /// Get the session nonce (also used to namespace resource locators).
    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Generate the next unique game ID.
    pub fn next_game(&mut self) -> GameId {
        GameId(self.next_raw())
    }

    fn next_raw(&mut self) -> u64 {
        let counter = self.counter;
        self.counter += 1;
        // Odd-constant multiply is a bijection on u64, so distinct counters
        // never collide under a fixed nonce.
        self.nonce ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}
