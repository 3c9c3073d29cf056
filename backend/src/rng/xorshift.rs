//! xorshift64* random number generator
//!
//! xorshift64* passes TestU01's BigCrush with 64 bits of state. Same seed
//! gives the same sequence, which is what makes a draw replayable from a
//! snapshot.

use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 0x2545_F491_4F6C_DD1D;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use team_draw_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let index = rng.below(24); // [0, 24)
/// assert!(index < 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1, since xorshift never leaves the zero state.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(MULTIPLIER)
    }

    /// Uniform index in `[0, bound)`
    ///
    /// Uses rejection sampling so that small bounds carry no modulo bias.
    ///
    /// # Panics
    /// Panics if `bound` is zero
    ///
    /// # Example
    /// ```
    /// use team_draw_core::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert_eq!(rng.below(1), 0);
    /// ```
    pub fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");

        self.below_u64(bound as u64) as usize
    }

    /// Uniform value in `[min, max]` (both inclusive)
    ///
    /// # Panics
    /// Panics if min > max
    pub fn between(&mut self, min: u64, max: u64) -> u64 {
        assert!(min <= max, "min must not exceed max");
        let span = max - min;
        if span == u64::MAX {
            return self.next();
        }
        min + self.below_u64(span + 1)
    }

    fn below_u64(&mut self, bound: u64) -> u64 {
        // Largest multiple of `bound` below 2^64; values at or above it are redrawn.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let value = self.next();
            if value < zone {
                return value % bound;
            }
        }
    }

    /// Shuffle a slice in place (Fisher–Yates)
    ///
    /// Walks from the last position down to the second, swapping each with a
    /// uniformly chosen position at or before it.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// Pick one element uniformly, `None` on an empty slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.below(items.len());
        items.get(index)
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// # Example
    /// ```
    /// use team_draw_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let state = rng.get_state();
    ///
    /// let mut resumed = RngManager::new(state);
    /// assert_eq!(rng.next(), resumed.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
