/// Deterministic RNG based on splitmix64. One generator is seeded per chain
/// and threaded through every walk; it is never reseeded mid-run.

#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Simple sequential RNG for walk directions and source selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = splitmix64(self.state);
        self.state
    }

    /// Uniform draw in `0..max`. `max` must be non-zero.
    pub fn range_usize(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        (self.next_u64() % max as u64) as usize
    }
}
