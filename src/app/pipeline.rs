//! Shared acquisition workflows used by the command handlers.
//!
//! Keeping these here keeps the handlers about presentation only:
//! config -> service -> requests -> series/awards -> summary.

use chrono::NaiveDate;

use crate::config::AcquisitionConfig;
use crate::data::AcquisitionService;
use crate::domain::{AwardList, MetricId, MetricRequest, MetricSeries};
use crate::error::AppError;
use crate::report::DashboardSummary;

/// Metrics shown on the overview cards.
pub const OVERVIEW_METRICS: [MetricId; 4] = [
    MetricId::ConstructionEmployment,
    MetricId::ConstructionWages,
    MetricId::UnemploymentRate,
    MetricId::LaborForce,
];

/// Everything the overview command prints.
#[derive(Debug, Clone)]
pub struct OverviewOutput {
    pub series: Vec<MetricSeries>,
    pub awards: AwardList,
    pub summary: DashboardSummary,
}

pub fn build_service(config: &AcquisitionConfig) -> Result<AcquisitionService, AppError> {
    Ok(AcquisitionService::new(config)?)
}

/// Fetch the overview metrics and the award list concurrently.
///
/// A metric whose request fails outright is logged and left off the cards;
/// the remaining cards are still shown.
pub fn fetch_overview(
    service: &AcquisitionService,
    region: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<OverviewOutput, AppError> {
    let requests = OVERVIEW_METRICS
        .into_iter()
        .map(|metric| MetricRequest::new(metric, region, start, end))
        .collect::<Result<Vec<_>, _>>()?;

    let (results, awards) = rayon::join(
        || service.get_many(&requests),
        || service.get_awards(region, start, end),
    );
    let awards = awards?;

    let mut series = Vec::with_capacity(results.len());
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(s) => series.push(s),
            Err(err) => {
                tracing::warn!(metric = %request.metric_id(), error = %err, "Overview metric unavailable")
            }
        }
    }

    let summary = DashboardSummary::build(requests[0].region(), &series, Some(&awards));
    Ok(OverviewOutput {
        series,
        awards,
        summary,
    })
}
