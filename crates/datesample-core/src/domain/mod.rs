//! # Domain Types
//!
//! Validated value types shared by the enumerator, sampler and validator.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CalendarDate`] | ISO `YYYY-MM-DD` date without a time zone |
//! | [`Seed`] | PRNG seed in `1..=4294967295` |
//! | [`CountryCode`] | Two-letter holiday calendar code |
//! | [`SamplingRequest`] | Validated input for one sampling run |
//!
//! All types enforce their invariants at construction time and serialize as
//! plain JSON scalars (dates as ISO strings, seeds as integers).

mod calendar_date;
mod country;
mod request;
mod seed;

pub use calendar_date::CalendarDate;
pub use country::CountryCode;
pub use request::SamplingRequest;
pub use seed::{Seed, MAX_SEED};
