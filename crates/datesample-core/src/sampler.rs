//! Duplicate-free batch sampling driven by [`Prng`].

use std::collections::HashSet;

use serde::Serialize;

use crate::{CalendarDate, Prng, SamplerConfig, SamplingError};

/// Default draw budget per candidate date.
///
/// Rejection sampling needs about `n * ln(n)` draws to collect every one of
/// `n` candidates, so the budget stays well above that for realistic ranges.
pub const DEFAULT_MAX_DRAWS_PER_CANDIDATE: u32 = 32;

/// Sampled dates, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleBatch {
    dates: Vec<CalendarDate>,
    #[serde(skip)]
    draw_order: Vec<CalendarDate>,
    draws: usize,
}

impl SampleBatch {
    pub fn dates(&self) -> &[CalendarDate] {
        &self.dates
    }

    /// Dates in the order they were accepted, before sorting.
    pub fn draw_order(&self) -> &[CalendarDate] {
        &self.draw_order
    }

    /// PRNG draws spent, rejected duplicates included.
    pub const fn draws(&self) -> usize {
        self.draws
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn into_dates(self) -> Vec<CalendarDate> {
        self.dates
    }
}

/// Rejection sampler without replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    max_draws_per_candidate: u32,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DRAWS_PER_CANDIDATE)
    }
}

impl Sampler {
    /// A budget of zero is raised to one draw per candidate.
    pub const fn new(max_draws_per_candidate: u32) -> Self {
        Self {
            max_draws_per_candidate: if max_draws_per_candidate == 0 {
                1
            } else {
                max_draws_per_candidate
            },
        }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.max_draws_per_candidate)
    }

    pub fn draw_budget(&self, candidates: usize) -> usize {
        candidates.saturating_mul(self.max_draws_per_candidate as usize)
    }

    /// Draw `n` distinct dates from `candidates`.
    ///
    /// `candidates` must not contain duplicates. For a fixed PRNG state,
    /// candidate list and `n` the accepted draw order is always the same.
    pub fn draw(
        &self,
        candidates: &[CalendarDate],
        n: usize,
        prng: &mut Prng,
    ) -> Result<SampleBatch, SamplingError> {
        if n == 0 {
            return Err(SamplingError::InvalidBatchSize);
        }
        if n > candidates.len() {
            return Err(SamplingError::InsufficientRange {
                requested: n,
                available: candidates.len(),
            });
        }

        let budget = self.draw_budget(candidates.len());
        let mut used = HashSet::with_capacity(n);
        let mut draw_order = Vec::with_capacity(n);
        let mut draws = 0;

        while draw_order.len() < n {
            if draws >= budget {
                tracing::debug!(
                    requested = n,
                    accepted = draw_order.len(),
                    draws,
                    "draw budget exhausted"
                );
                return Err(SamplingError::DrawLimitReached {
                    requested: n,
                    accepted: draw_order.len(),
                    draws,
                });
            }

            let index = prng.next_index(candidates.len());
            draws += 1;
            if used.insert(index) {
                draw_order.push(candidates[index]);
            }
        }

        let mut dates = draw_order.clone();
        dates.sort_unstable();

        tracing::debug!(
            requested = n,
            available = candidates.len(),
            draws,
            "sample drawn"
        );

        Ok(SampleBatch {
            dates,
            draw_order,
            draws,
        })
    }
}
