//! # datesample core
//!
//! Deterministic, seeded sampling of calendar dates.
//!
//! ## Overview
//!
//! Given a date range, a batch size and a seed, the crate draws a
//! reproducible set of distinct dates:
//!
//! - **Seeded PRNG** (Lehmer, modulus `2^31 - 1`, multiplier 48271)
//! - **Date range enumeration** with an optional weekend filter
//! - **Holiday filtering** through a pluggable lookup collaborator
//! - **Rejection sampler** without replacement
//! - **Input validation** that reports every failing field at once
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Sampler and holiday settings, environment overrides |
//! | [`domain`] | Calendar dates, seeds, country codes, sampling requests |
//! | [`error`] | Field, sampling and top-level error types |
//! | [`holidays`] | Holiday lookup contract and provider adapters |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`pipeline`] | End-to-end [`DateSampler`] |
//! | [`prng`] | Deterministic generator |
//! | [`range`] | Candidate enumeration |
//! | [`sampler`] | Batch drawing |
//! | [`validator`] | Raw input validation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datesample_core::{DateSampler, RawInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = RawInput::new()
//!         .with_start("2021-01-01")
//!         .with_end("2021-01-10")
//!         .with_batch_size("5")
//!         .with_seed("111");
//!
//!     let outcome = DateSampler::default().sample(&input).await?;
//!     for date in outcome.dates() {
//!         println!("{date}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │ RawInput
//!          ▼
//! ┌─────────────────┐
//! │ InputValidator  │──▶ ValidationErrors
//! └────────┬────────┘
//!          │ SamplingRequest
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ DateRange       │────▶│ HolidaySource    │
//! │ + holiday filter│     │ (HttpClient)     │
//! └────────┬────────┘     └──────────────────┘
//!          │ CandidateSet
//!          ▼
//! ┌─────────────────┐
//! │ Sampler + Prng  │──▶ SampleBatch
//! └─────────────────┘
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod holidays;
pub mod http_client;
pub mod pipeline;
pub mod prng;
pub mod range;
pub mod sampler;
pub mod validator;

pub use config::{ConfigError, HolidayConfig, HolidayFailurePolicy, SamplerConfig};
pub use domain::{CalendarDate, CountryCode, SamplingRequest, Seed, MAX_SEED};
pub use error::{CoreError, Field, FieldError, SamplingError, ValidationErrors};
pub use holidays::{
    HolidayLookupError, HolidayLookupErrorKind, HolidayProviderId, HolidayQuery, HolidaySet,
    HolidaySource, NagerDateSource, OpenHolidaysSource, StaticHolidaySource,
};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use pipeline::{DateSampler, FilteredCandidates, SamplingOutcome};
pub use prng::Prng;
pub use range::{enumerate, CandidateSet, DateRange, Days};
pub use sampler::{SampleBatch, Sampler, DEFAULT_MAX_DRAWS_PER_CANDIDATE};
pub use validator::{InputValidator, RawInput, Validation};
