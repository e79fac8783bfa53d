//! Provenance records: which source was attempted for a request and how it went.
//!
//! Records are advisory. The service hands each one to a [`ProvenanceObserver`]
//! after the result has been decided; observers never influence the result.

use serde::Serialize;

use crate::domain::{MetricId, ProviderKind};

/// Why a live source did not produce the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, DNS, TLS or timeout error.
    TransportFailure,
    /// Non-success HTTP status or an explicit error payload.
    ProviderRejected,
    /// The call succeeded but yielded zero usable observations.
    EmptyResult,
    /// The API key is missing or still the placeholder.
    MisconfiguredCredential,
    /// No client is registered for the metric.
    NoProvider,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::TransportFailure => "transport failure",
            FailureKind::ProviderRejected => "provider rejected",
            FailureKind::EmptyResult => "empty result",
            FailureKind::MisconfiguredCredential => "credential not configured",
            FailureKind::NoProvider => "no provider registered",
        }
    }
}

/// Final outcome of one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Live data was returned.
    Real,
    /// Synthetic data was substituted.
    Fallback,
    /// An error was surfaced to the caller.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvenanceRecord {
    pub metric_id: MetricId,
    pub region: String,
    /// Source attempted (`None` if no client was registered).
    pub source: Option<ProviderKind>,
    pub outcome: Outcome,
    pub reason: Option<FailureKind>,
    pub detail: String,
    /// Number of points handed to the caller (0 on failure).
    pub points: usize,
}

/// Sink for provenance records.
pub trait ProvenanceObserver: Send + Sync {
    fn record(&self, record: &ProvenanceRecord);
}

/// Default observer: one structured `tracing` event per record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProvenanceObserver for LogObserver {
    fn record(&self, record: &ProvenanceRecord) {
        let source = record.source.map(|s| s.id()).unwrap_or("none");
        let reason = record.reason.map(|r| r.label()).unwrap_or("");
        match record.outcome {
            Outcome::Real => tracing::info!(
                metric = %record.metric_id,
                region = %record.region,
                source,
                points = record.points,
                "live data"
            ),
            Outcome::Fallback => tracing::warn!(
                metric = %record.metric_id,
                region = %record.region,
                source,
                reason,
                detail = %record.detail,
                points = record.points,
                "using synthetic data"
            ),
            Outcome::Failed => tracing::error!(
                metric = %record.metric_id,
                region = %record.region,
                source,
                reason,
                detail = %record.detail,
                "acquisition failed"
            ),
        }
    }
}
