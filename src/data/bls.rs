//! Bureau of Labor Statistics public API (v2) client.
//!
//! One POST per call with a JSON body listing the series ids, the year range and
//! the registration key. State series ids embed the state's FIPS code:
//!
//! - CES state employment/earnings: `SMU{fips}00000{industry}{datatype}`
//! - LAUS state statewide data:     `LAUST{fips}00000000000{measure}`

use chrono::Datelike;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::{BLS_KEY_PLACEHOLDER, CredentialStatus, ProviderConfig};
use crate::data::provider::{ProviderClient, build_http_client, decode, ensure_supported, execute};
use crate::data::raw::{BlsResponse, ProviderPayload, RawProviderResponse, ResponseStatus};
use crate::domain::region::state_fips;
use crate::domain::{MetricId, MetricRequest, ProviderKind};
use crate::error::AcquisitionError;

const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

/// CES supersector 20 (construction), all employees / avg hourly earnings.
const CES_CONSTRUCTION: &str = "20000000";
const CES_ALL_EMPLOYEES: &str = "01";
const CES_AVG_HOURLY_EARNINGS: &str = "03";

const LAUS_UNEMPLOYMENT_RATE: &str = "03";
const LAUS_LABOR_FORCE: &str = "06";

#[derive(Debug, Serialize)]
struct BlsRequestBody<'a> {
    seriesid: Vec<String>,
    startyear: String,
    endyear: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

pub struct BlsClient {
    client: Client,
    config: ProviderConfig,
}

impl BlsClient {
    pub fn new(config: ProviderConfig) -> Result<Self, AcquisitionError> {
        Ok(Self {
            client: build_http_client(&config)?,
            config,
        })
    }

    /// BLS series id for a metric in a state, or `None` for unknown regions.
    pub fn series_id(metric: MetricId, region: &str) -> Option<String> {
        let fips = state_fips(region)?;
        match metric {
            MetricId::ConstructionEmployment => {
                Some(format!("SMU{fips}00000{CES_CONSTRUCTION}{CES_ALL_EMPLOYEES}"))
            }
            MetricId::ConstructionWages => {
                Some(format!("SMU{fips}00000{CES_CONSTRUCTION}{CES_AVG_HOURLY_EARNINGS}"))
            }
            MetricId::UnemploymentRate => Some(format!("LAUST{fips}00000000000{LAUS_UNEMPLOYMENT_RATE}")),
            MetricId::LaborForce => Some(format!("LAUST{fips}00000000000{LAUS_LABOR_FORCE}")),
            _ => None,
        }
    }

    /// Classify a BLS response body.
    pub fn interpret(metric: MetricId, status: StatusCode, body: &str) -> RawProviderResponse {
        let parsed: BlsResponse = match decode(ProviderKind::Bls, metric, status, body) {
            Ok(parsed) => parsed,
            Err(failure) => return failure,
        };

        if parsed.status != REQUEST_SUCCEEDED {
            let detail = if parsed.message.is_empty() {
                format!("BLS status {}", parsed.status)
            } else {
                parsed.message.join("; ")
            };
            return RawProviderResponse::failure(
                ProviderKind::Bls,
                metric,
                ResponseStatus::ProviderError,
                detail,
            );
        }

        if parsed.observation_count() == 0 {
            let detail = if parsed.message.is_empty() {
                "BLS returned no series data".to_string()
            } else {
                parsed.message.join("; ")
            };
            return RawProviderResponse::failure(ProviderKind::Bls, metric, ResponseStatus::Empty, detail);
        }

        RawProviderResponse::success(ProviderKind::Bls, metric, ProviderPayload::Bls(parsed))
    }
}

impl ProviderClient for BlsClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bls
    }

    fn fetch(&self, request: &MetricRequest) -> Result<RawProviderResponse, AcquisitionError> {
        ensure_supported(self, request)?;
        let metric = request.metric_id();

        if self.config.credential_status(BLS_KEY_PLACEHOLDER) == CredentialStatus::Placeholder {
            return Ok(RawProviderResponse::failure(
                ProviderKind::Bls,
                metric,
                ResponseStatus::NotConfigured,
                "BLS registration key not configured",
            ));
        }

        let Some(series_id) = Self::series_id(metric, request.region()) else {
            return Ok(RawProviderResponse::failure(
                ProviderKind::Bls,
                metric,
                ResponseStatus::ProviderError,
                format!("No BLS series for region '{}'", request.region()),
            ));
        };

        let body = BlsRequestBody {
            seriesid: vec![series_id.clone()],
            startyear: request.start_date().year().to_string(),
            endyear: request.end_date().year().to_string(),
            registrationkey: self.config.api_key.as_deref(),
        };

        tracing::debug!(series_id = %series_id, start = %body.startyear, end = %body.endyear, "BLS request");
        let req = self.client.post(&self.config.endpoint).json(&body);
        let response = match execute(ProviderKind::Bls, metric, req) {
            Ok((status, text)) => Self::interpret(metric, status, &text),
            Err(failure) => failure,
        };
        Ok(response)
    }
}
