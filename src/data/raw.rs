//! Raw provider responses.
//!
//! Each provider client returns a [`RawProviderResponse`]: a classification of
//! how the call went plus a provider-specific payload. The payload structs
//! mirror the wire format closely and are deliberately lenient (`serde(default)`
//! everywhere, [`Scalar`] for fields that arrive as either strings or numbers)
//! so a shape surprise degrades to skipped points instead of a parse failure.

use serde::Deserialize;

use crate::data::provenance::FailureKind;
use crate::domain::{MetricId, ProviderKind};

/// How a provider call went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    /// The server answered with a non-2xx status.
    HttpError,
    /// 2xx, but the body is an explicit error or not the expected shape.
    ProviderError,
    /// 2xx and well-formed, but carried no series / observations / results.
    Empty,
    /// The required API key is missing or the placeholder; no call was made.
    NotConfigured,
    /// Connection, DNS, TLS or timeout failure.
    TransportFailure,
}

impl ResponseStatus {
    /// Failure class recorded in provenance, `None` for success.
    pub fn failure_kind(self) -> Option<FailureKind> {
        match self {
            ResponseStatus::Success => None,
            ResponseStatus::HttpError | ResponseStatus::ProviderError => Some(FailureKind::ProviderRejected),
            ResponseStatus::Empty => Some(FailureKind::EmptyResult),
            ResponseStatus::NotConfigured => Some(FailureKind::MisconfiguredCredential),
            ResponseStatus::TransportFailure => Some(FailureKind::TransportFailure),
        }
    }
}

/// Provider-specific payload, one variant per provider.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    Bls(BlsResponse),
    Fred(FredResponse),
    Spending(SpendingResponse),
    None,
}

#[derive(Debug, Clone)]
pub struct RawProviderResponse {
    pub provider: ProviderKind,
    pub metric_id: MetricId,
    pub status: ResponseStatus,
    pub status_detail: String,
    pub payload: ProviderPayload,
}

impl RawProviderResponse {
    pub fn success(provider: ProviderKind, metric_id: MetricId, payload: ProviderPayload) -> Self {
        Self {
            provider,
            metric_id,
            status: ResponseStatus::Success,
            status_detail: String::new(),
            payload,
        }
    }

    pub fn failure(
        provider: ProviderKind,
        metric_id: MetricId,
        status: ResponseStatus,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            metric_id,
            status,
            status_detail: detail.into(),
            payload: ProviderPayload::None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// A JSON scalar that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Finite numeric value, or `None` for blanks, missing-value markers
    /// (`"."`, `"-"`), unparseable text, NaN and infinities.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Scalar::Number(v) => *v,
            Scalar::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed == "." || trimmed == "-" {
                    return None;
                }
                trimmed.replace(',', "").parse::<f64>().ok()?
            }
        };
        v.is_finite().then_some(v)
    }

    pub fn to_text(&self) -> String {
        match self {
            Scalar::Number(v) => v.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Scalar::Number(v) if v.fract() == 0.0 && v.is_finite() => i32::try_from(*v as i64).ok(),
            Scalar::Number(_) => None,
            Scalar::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

// ============================================================================
// BLS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BlsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(rename = "Results", default)]
    pub results: Option<BlsResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlsResults {
    #[serde(default)]
    pub series: Vec<BlsSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlsSeries {
    #[serde(rename = "seriesID", default)]
    pub series_id: String,
    #[serde(default)]
    pub data: Vec<BlsDatum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlsDatum {
    pub year: Scalar,
    pub period: String,
    pub value: Option<Scalar>,
}

impl BlsResponse {
    pub fn observation_count(&self) -> usize {
        self.results
            .as_ref()
            .map(|r| r.series.iter().map(|s| s.data.len()).sum())
            .unwrap_or(0)
    }
}

// ============================================================================
// FRED
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct FredResponse {
    #[serde(default)]
    pub observations: Vec<FredObservation>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FredObservation {
    pub date: String,
    pub value: Option<Scalar>,
}

// ============================================================================
// USAspending
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SpendingResponse {
    #[serde(default)]
    pub results: Vec<SpendingAward>,
    /// Present on validation failures (HTTP 422 and friends).
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpendingAward {
    #[serde(default, alias = "Award ID")]
    pub award_id: Option<Scalar>,
    #[serde(default, alias = "Recipient Name")]
    pub recipient_name: Option<String>,
    #[serde(default, alias = "Award Amount")]
    pub total_obligation: Option<Scalar>,
    #[serde(default, alias = "Start Date")]
    pub award_date: Option<String>,
    #[serde(default)]
    pub naics_description: Option<String>,
    #[serde(default, alias = "Awarding Agency")]
    pub awarding_agency_name: Option<String>,
}
