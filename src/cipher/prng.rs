//! Seeded linear-congruential generator

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

/// Reproducible LCG, `state = (state * 1103515245 + 12345) mod 2^31`.
///
/// Output depends on the order of calls, so every layer creates its own
/// instance and draws in a fixed order.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a generator seeded with a 32-bit layer hash
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Advance the state and return it reduced modulo `bound`.
    ///
    /// `bound` must be non-zero.
    pub fn next(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "Lcg bound must be non-zero");
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        (self.state % bound.max(1) as u64) as usize
    }
}
