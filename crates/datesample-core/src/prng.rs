//! Seeded Lehmer (Park-Miller) generator.
//!
//! The generator is not a platform random source: a seed must
//! reproduce the exact same draw sequence on every run and every machine.
//!
//! ```rust
//! use datesample_core::{Prng, Seed};
//!
//! let seed = Seed::new(111)?;
//! let mut first = Prng::new(seed);
//! let mut second = Prng::new(seed);
//! assert_eq!(first.next(1, 10), second.next(1, 10));
//! # Ok::<(), datesample_core::SamplingError>(())
//! ```

use crate::{SamplingError, Seed};

/// Modulus `2^31 - 1`.
pub const MODULUS: u32 = 2_147_483_647;
/// Multiplier 48271.
pub const MULTIPLIER: u32 = 48_271;

const QUOTIENT: u32 = MODULUS / MULTIPLIER;
const REMAINDER: u32 = MODULUS % MULTIPLIER;
/// Never emitted; the draw is repeated instead.
const DEGENERATE_STATE: u32 = MODULUS - 1;

/// Deterministic integer generator owned by one sampling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u32,
}

impl Prng {
    /// Seeds above the modulus are reduced; a seed that reduces to zero starts at 1.
    pub fn new(seed: Seed) -> Self {
        let reduced = seed.get() % MODULUS;
        Self {
            state: if reduced == 0 { 1 } else { reduced },
        }
    }

    /// Build from an unchecked integer seed.
    pub fn from_raw(seed: i64) -> Result<Self, SamplingError> {
        Seed::new(seed).map(Self::new)
    }

    /// Current internal state, always in `1..MODULUS`.
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Next integer in `min..=max`. Reversed bounds are swapped.
    pub fn next(&mut self, min: i64, max: i64) -> i64 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };

        loop {
            self.advance();
            if self.state != DEGENERATE_STATE {
                break;
            }
        }

        let span = high as f64 - low as f64 + 1.0;
        let value = (f64::from(self.state) / f64::from(MODULUS) * span + low as f64).floor() as i64;
        value.clamp(low, high)
    }

    /// Next index in `0..len`; `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        let upper = i64::try_from(len.saturating_sub(1)).unwrap_or(i64::MAX);
        usize::try_from(self.next(0, upper)).unwrap_or(0)
    }

    // Schrage's decomposition keeps `A * state mod M` within 32-bit products.
    fn advance(&mut self) {
        let high = i64::from(self.state / QUOTIENT);
        let low = i64::from(self.state % QUOTIENT);
        let next = i64::from(MULTIPLIER) * low - i64::from(REMAINDER) * high;
        let next = if next > 0 { next } else { next + i64::from(MODULUS) };
        self.state = next as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prng(seed: i64) -> Prng {
        Prng::from_raw(seed).expect("valid seed")
    }

    #[test]
    fn matches_reference_lehmer_states() {
        let mut generator = prng(111);
        let mut states = Vec::new();
        for _ in 0..5 {
            generator.advance();
            states.push(generator.state());
        }
        assert_eq!(
            states,
            vec![5_358_081, 941_890_311, 1_610_911_644, 2_080_593_301, 951_513_322]
        );
    }

    #[test]
    fn schrage_step_equals_wide_multiplication() {
        let mut generator = prng(987_654_321);
        for _ in 0..10_000 {
            let expected = (u64::from(generator.state()) * u64::from(MULTIPLIER)
                % u64::from(MODULUS)) as u32;
            generator.advance();
            assert_eq!(generator.state(), expected);
        }
    }

    #[test]
    fn same_seed_replays_same_sequence() {
        let mut first = prng(111);
        let mut second = prng(111);
        let a = (0..10).map(|_| first.next(1, 10)).collect::<Vec<_>>();
        let b = (0..10).map(|_| second.next(1, 10)).collect::<Vec<_>>();
        assert_eq!(a, b);
        assert_eq!(a, vec![1, 5, 8, 10, 5, 1, 2, 2, 2, 6]);
    }

    #[test]
    fn values_stay_within_inclusive_bounds() {
        let mut generator = prng(42);
        for _ in 0..50_000 {
            let value = generator.next(-3, 3);
            assert!((-3..=3).contains(&value));
            assert_ne!(generator.state(), DEGENERATE_STATE);
        }
    }

    #[test]
    fn single_value_range_is_constant() {
        let mut generator = prng(9);
        for _ in 0..100 {
            assert_eq!(generator.next(4, 4), 4);
        }
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let mut forward = prng(5);
        let mut reversed = prng(5);
        for _ in 0..100 {
            assert_eq!(forward.next(0, 9), reversed.next(9, 0));
        }
    }

    #[test]
    fn skips_degenerate_state() {
        // Start one step before the degenerate state.
        let mut generator = Prng {
            state: inverse_step(DEGENERATE_STATE),
        };
        generator.next(0, 100);
        assert_ne!(generator.state(), DEGENERATE_STATE);
    }

    #[test]
    fn seeds_reducing_to_zero_start_at_one() {
        assert_eq!(prng(i64::from(MODULUS)).state(), 1);
        assert_eq!(prng(2 * i64::from(MODULUS)).state(), 1);
        assert_eq!(prng(1).state(), 1);
    }

    #[test]
    fn rejects_out_of_range_seeds() {
        assert!(matches!(
            Prng::from_raw(0),
            Err(SamplingError::InvalidSeed { seed: 0 })
        ));
        assert!(Prng::from_raw(-5).is_err());
        assert!(Prng::from_raw(4_294_967_296).is_err());
        assert!(Prng::from_raw(4_294_967_295).is_ok());
    }

    fn inverse_step(target: u32) -> u32 {
        // Modular inverse of MULTIPLIER via Fermat: A^(M-2) mod M.
        let modulus = u64::from(MODULUS);
        let mut base = u64::from(MULTIPLIER);
        let mut exponent = modulus - 2;
        let mut inverse = 1_u64;
        while exponent > 0 {
            if exponent & 1 == 1 {
                inverse = inverse * base % modulus;
            }
            base = base * base % modulus;
            exponent >>= 1;
        }
        (u64::from(target) * inverse % modulus) as u32
    }
}
