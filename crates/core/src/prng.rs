//! Deterministic Xorshift64 generator shared by every seeded source.
//!
//! The permutation table, the hoisted generator site sets and the voxel
//! world all draw from this generator, so a context seed fully determines
//! the output image on every platform (integer core, no float state).

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Shift triple (13, 7, 17). A seed of 0 is replaced with a fixed non-zero
/// value since zero is a fixed point of the recurrence.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// A `max` of 0 is treated as 1 so callers sizing ranges from image
    /// dimensions never divide by zero.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max.max(1)
    }

    /// Returns an i32 in [min, max). Returns `min` when the range is empty.
    pub fn next_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        min + self.next_usize((max - min) as usize) as i32
    }

    /// Draws one value and reports whether it fell below `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// In-place Fisher–Yates shuffle, walking from the last index down.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_usize(i + 1);
            items.swap(i, j);
        }
    }
}
