use itertools::Itertools;
use rand_core::{impls, Error, RngCore, SeedableRng};

use crate::error::EngineError;

// xorshift has a fixed point at zero
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// Marsaglia's 32-bit xorshift generator.
///
/// The same seed and the same sequence of calls always yield the same values,
/// which is what makes stages reproducible. Each [`Engine`](crate::Engine) owns its own instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Seed the generator. A zero seed is replaced by a fixed non-zero constant.
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed } }
    }

    /// Seed from the thread-local entropy source, returning the seed used alongside the generator.
    pub fn entropy_seeded() -> (u64, Self) {
        let seed: u32 = rand::random();
        (seed as u64, Self::new(seed))
    }

    /// Next raw 32-bit value.
    pub fn next_uint32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_float01(&mut self) -> f64 {
        self.next_uint32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform integer in `0..max_exclusive`; always 0 when `max_exclusive` is 0.
    pub fn next_int(&mut self, max_exclusive: u32) -> u32 {
        (self.next_float01() * max_exclusive as f64) as u32
    }

    /// Draw one entry of `weights` with probability proportional to its weight,
    /// considering only entries for which `enabled` holds and whose weight is positive.
    ///
    /// Returns [`EngineError::NoSelectablePiece`] if the filtered total is not positive.
    /// Exactly one value is drawn from the generator on success.
    pub fn pick_weighted<'a, T>(&mut self, weights: &'a [(T, f64)], enabled: impl Fn(&T) -> bool) -> Result<&'a T, EngineError> {
        let selectable = weights.iter()
            .filter(|(item, weight)| *weight > 0.0 && enabled(item))
            .collect_vec();

        let total: f64 = selectable.iter().map(|(_, weight)| weight).sum();
        if !(total > 0.0) {
            return Err(EngineError::NoSelectablePiece { total });
        }

        let mut target = self.next_float01() * total;
        let mut last = None;
        for (item, weight) in selectable {
            if target < *weight {
                return Ok(item);
            }
            target -= weight;
            last = Some(item);
        }

        // float rounding can leave a sliver past the final bucket
        last.ok_or(EngineError::NoSelectablePiece { total })
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        self.next_uint32()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Folds the high half onto the low half, so seeds below 2^32 are used verbatim.
    fn seed_from_u64(state: u64) -> Self {
        Self::new((state as u32) ^ ((state >> 32) as u32))
    }
}
