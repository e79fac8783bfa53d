//! FRED API integration for national economic indicators.
//!
//! One GET per call against `series/observations`. The key travels in the query
//! string, so a placeholder key is caught before any request is built.

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::{CredentialStatus, FRED_KEY_PLACEHOLDER, ProviderConfig};
use crate::data::provider::{ProviderClient, build_http_client, decode, ensure_supported, execute};
use crate::data::raw::{FredResponse, ProviderPayload, RawProviderResponse, ResponseStatus};
use crate::domain::{MetricId, MetricRequest, ProviderKind};
use crate::error::AcquisitionError;

const SERIES_CPI: &str = "CPIAUCSL";
const SERIES_PPI_FINAL_DEMAND: &str = "WPUFD4";
const SERIES_FED_FUNDS: &str = "FEDFUNDS";

pub struct FredClient {
    client: Client,
    config: ProviderConfig,
}

impl FredClient {
    pub fn new(config: ProviderConfig) -> Result<Self, AcquisitionError> {
        Ok(Self {
            client: build_http_client(&config)?,
            config,
        })
    }

    /// FRED series id for a metric. These indicators are national, so the
    /// region does not enter the id.
    pub fn series_id(metric: MetricId) -> Option<&'static str> {
        match metric {
            MetricId::Cpi => Some(SERIES_CPI),
            MetricId::PpiConstruction => Some(SERIES_PPI_FINAL_DEMAND),
            MetricId::InterestRate => Some(SERIES_FED_FUNDS),
            _ => None,
        }
    }

    /// Classify a FRED response body.
    pub fn interpret(metric: MetricId, status: StatusCode, body: &str) -> RawProviderResponse {
        let parsed: FredResponse = match decode(ProviderKind::Fred, metric, status, body) {
            Ok(parsed) => parsed,
            Err(failure) => return failure,
        };

        if let Some(message) = parsed.error_message.as_deref() {
            return RawProviderResponse::failure(
                ProviderKind::Fred,
                metric,
                ResponseStatus::ProviderError,
                message,
            );
        }

        if parsed.observations.is_empty() {
            return RawProviderResponse::failure(
                ProviderKind::Fred,
                metric,
                ResponseStatus::Empty,
                "FRED returned no observations",
            );
        }

        RawProviderResponse::success(ProviderKind::Fred, metric, ProviderPayload::Fred(parsed))
    }
}

impl ProviderClient for FredClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fred
    }

    fn fetch(&self, request: &MetricRequest) -> Result<RawProviderResponse, AcquisitionError> {
        ensure_supported(self, request)?;
        let metric = request.metric_id();

        let api_key = match (
            self.config.credential_status(FRED_KEY_PLACEHOLDER),
            self.config.api_key.as_deref(),
        ) {
            (CredentialStatus::Configured, Some(key)) => key,
            _ => {
                return Ok(RawProviderResponse::failure(
                    ProviderKind::Fred,
                    metric,
                    ResponseStatus::NotConfigured,
                    "FRED API key not configured",
                ));
            }
        };

        let Some(series_id) = Self::series_id(metric) else {
            return Err(AcquisitionError::UnsupportedMetric(metric.to_string()));
        };

        let start = request.start_date().to_string();
        let end = request.end_date().to_string();
        tracing::debug!(series_id, start = %start, end = %end, "FRED request");

        let req = self.client.get(&self.config.endpoint).query(&[
            ("series_id", series_id),
            ("api_key", api_key),
            ("file_type", "json"),
            ("observation_start", start.as_str()),
            ("observation_end", end.as_str()),
        ]);

        let response = match execute(ProviderKind::Fred, metric, req) {
            Ok((status, text)) => Self::interpret(metric, status, &text),
            Err(failure) => failure,
        };
        Ok(response)
    }
}
