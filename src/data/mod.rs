//! Data acquisition: provider clients, normalization, synthetic fallback, and
//! the service that ties them together.

pub mod bls;
pub mod fred;
pub mod normalize;
pub mod provenance;
pub mod provider;
pub mod raw;
pub mod sample;
pub mod service;
pub mod spending;

pub use bls::BlsClient;
pub use fred::FredClient;
pub use normalize::{NormalizeError, canonicalize, normalize, normalize_awards};
pub use provenance::{FailureKind, LogObserver, Outcome, ProvenanceObserver, ProvenanceRecord};
pub use provider::ProviderClient;
pub use raw::{RawProviderResponse, ResponseStatus};
pub use sample::{SYNTHETIC_SOURCE, generate_awards, generate_series};
pub use service::AcquisitionService;
pub use spending::SpendingClient;
