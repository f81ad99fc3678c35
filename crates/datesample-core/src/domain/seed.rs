use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::SamplingError;

/// Largest accepted seed, `2^32 - 1`.
pub const MAX_SEED: i64 = u32::MAX as i64;

/// PRNG seed in `1..=4294967295`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Seed(NonZeroU32);

impl Seed {
    pub fn new(value: i64) -> Result<Self, SamplingError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(SamplingError::InvalidSeed { seed: value })
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Display for Seed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Seed {
    type Error = SamplingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Seed> for u32 {
    fn from(value: Seed) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_positive_u32_range() {
        assert_eq!(Seed::new(1).expect("valid").get(), 1);
        assert_eq!(Seed::new(MAX_SEED).expect("valid").get(), u32::MAX);
    }

    #[test]
    fn rejects_zero_negative_and_oversized_seeds() {
        for raw in [0, -1, MAX_SEED + 1] {
            let err = Seed::new(raw).expect_err("must fail");
            assert_eq!(err, SamplingError::InvalidSeed { seed: raw });
        }
    }
}
