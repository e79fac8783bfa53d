//! Provider client trait and the HTTP plumbing the concrete clients share.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ProviderConfig;
use crate::data::raw::{RawProviderResponse, ResponseStatus};
use crate::domain::{MetricId, MetricRequest, ProviderKind};
use crate::error::AcquisitionError;

/// Longest slice of an error body kept in `status_detail`.
const DETAIL_SNIPPET: usize = 200;

/// A client for exactly one external data source.
///
/// `fetch` performs at most one outbound call and never retries. The only error
/// it returns is `UnsupportedMetric`; every other outcome is classified into
/// [`RawProviderResponse::status`].
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn supports(&self, metric: MetricId) -> bool {
        metric.provider() == self.kind()
    }

    fn fetch(&self, request: &MetricRequest) -> Result<RawProviderResponse, AcquisitionError>;
}

pub(crate) fn ensure_supported(
    client: &impl ProviderClient,
    request: &MetricRequest,
) -> Result<(), AcquisitionError> {
    if client.supports(request.metric_id()) {
        Ok(())
    } else {
        Err(AcquisitionError::UnsupportedMetric(format!(
            "{} (not served by {})",
            request.metric_id(),
            client.kind().id()
        )))
    }
}

pub(crate) fn build_http_client(config: &ProviderConfig) -> Result<Client, AcquisitionError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("laborstat/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send a prepared request and read the body.
///
/// Transport-level errors (including timeouts) come back as a
/// `TransportFailure` response.
pub(crate) fn execute(
    provider: ProviderKind,
    metric: MetricId,
    request: RequestBuilder,
) -> Result<(StatusCode, String), RawProviderResponse> {
    let response = request.send().map_err(|e| {
        let kind = if e.is_timeout() { "timed out" } else { "failed" };
        RawProviderResponse::failure(
            provider,
            metric,
            ResponseStatus::TransportFailure,
            format!("{} request {kind}: {e}", provider.id()),
        )
    })?;

    let status = response.status();
    let body = response.text().map_err(|e| {
        RawProviderResponse::failure(
            provider,
            metric,
            ResponseStatus::TransportFailure,
            format!("Failed to read {} response body: {e}", provider.id()),
        )
    })?;

    Ok((status, body))
}

/// Check the HTTP status and parse the body as `T`.
pub(crate) fn decode<T: DeserializeOwned>(
    provider: ProviderKind,
    metric: MetricId,
    status: StatusCode,
    body: &str,
) -> Result<T, RawProviderResponse> {
    if !status.is_success() {
        return Err(RawProviderResponse::failure(
            provider,
            metric,
            ResponseStatus::HttpError,
            format!("HTTP {}: {}", status.as_u16(), snippet(body)),
        ));
    }

    serde_json::from_str(body).map_err(|e| {
        RawProviderResponse::failure(
            provider,
            metric,
            ResponseStatus::ProviderError,
            format!("Unexpected {} response shape: {e}", provider.id()),
        )
    })
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= DETAIL_SNIPPET {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(DETAIL_SNIPPET).collect();
    out.push('…');
    out
}
