//! Domain types shared by the providers, the normalizer and the synthesizer.
//!
//! This module defines:
//!
//! - the metric catalogue (`MetricId`, `ProviderKind`, `Frequency`)
//! - the per-call request (`MetricRequest`)
//! - the caller-facing results (`MetricSeries`, `AwardList`)

pub mod calendar;
pub mod region;
pub mod types;

pub use types::*;
