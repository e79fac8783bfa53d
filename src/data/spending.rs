//! USAspending.gov `spending_by_award` client.
//!
//! No authentication. The request is a structured filter (contract award types,
//! construction NAICS sector, recipient state, date window) with a single
//! result page sorted by obligation, largest first.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::{MAX_PAGE_LIMIT, ProviderConfig};
use crate::data::provider::{ProviderClient, build_http_client, decode, ensure_supported, execute};
use crate::data::raw::{ProviderPayload, RawProviderResponse, ResponseStatus, SpendingResponse};
use crate::domain::{MetricId, MetricRequest, ProviderKind};
use crate::error::AcquisitionError;

/// Definitive contracts, purchase orders, delivery orders, BPA calls.
const CONTRACT_AWARD_TYPES: [&str; 4] = ["A", "B", "C", "D"];
/// NAICS sector 23: construction.
const CONSTRUCTION_NAICS: [&str; 1] = ["23"];
const FIELDS: [&str; 7] = [
    "award_id",
    "recipient_name",
    "total_obligation",
    "award_date",
    "naics_code",
    "naics_description",
    "awarding_agency_name",
];

#[derive(Debug, Serialize)]
struct SpendingRequestBody<'a> {
    filters: Filters<'a>,
    fields: &'a [&'a str],
    page: u32,
    limit: usize,
    sort: &'a str,
    order: &'a str,
}

#[derive(Debug, Serialize)]
struct Filters<'a> {
    award_type_codes: &'a [&'a str],
    naics_codes: &'a [&'a str],
    recipient_locations: Vec<RecipientLocation<'a>>,
    time_period: Vec<TimePeriod>,
}

#[derive(Debug, Serialize)]
struct RecipientLocation<'a> {
    country: &'a str,
    state: &'a str,
}

#[derive(Debug, Serialize)]
struct TimePeriod {
    start_date: String,
    end_date: String,
}

pub struct SpendingClient {
    client: Client,
    config: ProviderConfig,
}

impl SpendingClient {
    pub fn new(config: ProviderConfig) -> Result<Self, AcquisitionError> {
        Ok(Self {
            client: build_http_client(&config)?,
            config,
        })
    }

    fn page_limit(&self) -> usize {
        self.config.page_limit.clamp(1, MAX_PAGE_LIMIT)
    }

    fn request_body<'a>(&self, request: &'a MetricRequest) -> SpendingRequestBody<'a> {
        SpendingRequestBody {
            filters: Filters {
                award_type_codes: &CONTRACT_AWARD_TYPES,
                naics_codes: &CONSTRUCTION_NAICS,
                recipient_locations: vec![RecipientLocation {
                    country: "USA",
                    state: request.region(),
                }],
                time_period: vec![TimePeriod {
                    start_date: request.start_date().to_string(),
                    end_date: request.end_date().to_string(),
                }],
            },
            fields: &FIELDS,
            page: 1,
            limit: self.page_limit(),
            sort: "total_obligation",
            order: "desc",
        }
    }

    /// Classify a USAspending response body.
    pub fn interpret(metric: MetricId, status: StatusCode, body: &str) -> RawProviderResponse {
        let parsed: SpendingResponse = match decode(ProviderKind::UsaSpending, metric, status, body) {
            Ok(parsed) => parsed,
            Err(failure) => return failure,
        };

        if parsed.results.is_empty() {
            if let Some(detail) = parsed.detail.as_deref() {
                return RawProviderResponse::failure(
                    ProviderKind::UsaSpending,
                    metric,
                    ResponseStatus::ProviderError,
                    detail,
                );
            }
            return RawProviderResponse::failure(
                ProviderKind::UsaSpending,
                metric,
                ResponseStatus::Empty,
                "No contract awards matched the filter",
            );
        }

        RawProviderResponse::success(ProviderKind::UsaSpending, metric, ProviderPayload::Spending(parsed))
    }
}

impl ProviderClient for SpendingClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::UsaSpending
    }

    fn fetch(&self, request: &MetricRequest) -> Result<RawProviderResponse, AcquisitionError> {
        ensure_supported(self, request)?;
        let metric = request.metric_id();
        let body = self.request_body(request);

        tracing::debug!(
            region = request.region(),
            start = %request.start_date(),
            end = %request.end_date(),
            limit = body.limit,
            "USAspending request"
        );
        let req = self.client.post(&self.config.endpoint).json(&body);
        let response = match execute(ProviderKind::UsaSpending, metric, req) {
            Ok((status, text)) => Self::interpret(metric, status, &text),
            Err(failure) => failure,
        };
        Ok(response)
    }
}
