//! Synthetic series generation: the fallback when live data is unavailable.
//!
//! Every metric has one formula: `baseline + trend * i + N(0, sigma)` where `i`
//! is the month offset from the request start. The RNG is seeded from the
//! request (metric, region, range) plus a configurable salt, so repeated
//! requests produce the same draw.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::domain::calendar::{add_months, is_quarter_start, months_between};
use crate::domain::{
    AwardList, AwardRecord, Frequency, MetricId, MetricRequest, MetricSeries, ObservationPoint, Provenance,
};
use crate::error::AcquisitionError;

/// Source name attached to every synthetic result.
pub const SYNTHETIC_SOURCE: &str = "Synthetic (fallback)";

/// Baseline-plus-trend model for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formula {
    pub baseline: f64,
    /// Added per month elapsed since the request start.
    pub trend_per_month: f64,
    /// Standard deviation of the Gaussian noise term.
    pub noise_sigma: f64,
}

/// Formula table. Levels are calibrated to New Jersey construction.
pub fn formula(metric: MetricId) -> Formula {
    let (baseline, trend_per_month, noise_sigma) = match metric {
        MetricId::ConstructionEmployment => (145_000.0, 200.0, 500.0),
        MetricId::ConstructionWages => (35.0, 0.8, 0.5),
        MetricId::UnemploymentRate => (5.5, 0.0, 0.4),
        MetricId::LaborForce => (4_500_000.0, 1_000.0, 2_000.0),
        MetricId::FederalSpending => (15_000_000.0, 50_000.0, 2_500_000.0),
        MetricId::Cpi => (100.0, 0.25, 0.1),
        MetricId::PpiConstruction => (100.0, 0.35, 0.15),
        MetricId::InterestRate => (2.5, 0.12, 0.05),
    };
    Formula {
        baseline,
        trend_per_month,
        noise_sigma,
    }
}

/// Generate a synthetic series for `request` without touching the network.
pub fn generate_series(request: &MetricRequest, seed_salt: u64) -> Result<MetricSeries, AcquisitionError> {
    let metric = request.metric_id();
    let dates = period_dates(request);

    let f = formula(metric);
    let mut rng = StdRng::seed_from_u64(series_seed(request, seed_salt));

    let points = dates
        .into_iter()
        .map(|date| {
            let i = months_between(request.start_date(), date) as f64;
            let z: f64 = rng.sample(StandardNormal);
            let mut value = f.baseline + f.trend_per_month * i + f.noise_sigma * z;
            if metric.non_negative() {
                value = value.max(0.0);
            }
            ObservationPoint::new(date, value)
        })
        .collect();

    MetricSeries::new(metric, request.region(), points, Provenance::Synthetic, SYNTHETIC_SOURCE)
}

/// Period start dates within `[start, end]` at the metric's native frequency.
///
/// Quarterly metrics degrade to monthly when the range holds no quarter start,
/// so a valid request always yields at least one date.
fn period_dates(request: &MetricRequest) -> Vec<NaiveDate> {
    let months = month_starts(request.start_date(), request.end_date());
    if request.metric_id().frequency() == Frequency::Quarterly {
        let quarters: Vec<NaiveDate> = months.iter().copied().filter(|d| is_quarter_start(*d)).collect();
        if !quarters.is_empty() {
            return quarters;
        }
    }
    months
}

/// First-of-month dates from `start` (already month-aligned) through `end`.
fn month_starts(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut offset = 0;
    while let Some(date) = add_months(start, offset) {
        if date > end {
            break;
        }
        out.push(date);
        offset += 1;
    }
    out
}

fn series_seed(request: &MetricRequest, salt: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    request.metric_id().hash(&mut hasher);
    request.region().hash(&mut hasher);
    request.start_date().hash(&mut hasher);
    request.end_date().hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Awards
// ============================================================================

const NJ_RECIPIENTS: [(&str, f64, &str); 12] = [
    ("Earlco Construction", 12_500_000.0, "Heavy Construction"),
    ("Boyce Excavation", 8_900_000.0, "Excavation Services"),
    ("NJ Department of Transportation", 45_000_000.0, "Highway Construction"),
    ("Bergen County Construction", 22_000_000.0, "Building Construction"),
    ("Essex County Infrastructure", 18_000_000.0, "Infrastructure"),
    ("Hudson County Projects", 15_000_000.0, "Development Projects"),
    ("Middlesex County Development", 12_000_000.0, "Commercial Construction"),
    ("Union County Construction", 9_500_000.0, "Residential Construction"),
    ("Passaic County Projects", 8_500_000.0, "Road Construction"),
    ("Monmouth County Development", 7_500_000.0, "Bridge Construction"),
    ("Ocean County Infrastructure", 6_500_000.0, "Utility Construction"),
    ("Morris County Construction", 5_500_000.0, "Site Preparation"),
];

/// Generate a synthetic award list for `request`'s region and range.
///
/// Award dates are spread evenly across the range; obligations vary ±10%
/// around fixed levels. Outside New Jersey the recipient names are generic.
pub fn generate_awards(request: &MetricRequest, seed_salt: u64) -> AwardList {
    let mut rng = StdRng::seed_from_u64(series_seed(request, seed_salt));
    let span_days = (request.end_date() - request.start_date()).num_days().max(0);
    let n = NJ_RECIPIENTS.len() as i64;
    let is_nj = request.region() == "NJ";

    let mut awards: Vec<AwardRecord> = NJ_RECIPIENTS
        .iter()
        .enumerate()
        .map(|(i, (name, amount, naics))| {
            let offset = if n > 1 { span_days * i as i64 / (n - 1) } else { 0 };
            let award_date = request
                .start_date()
                .checked_add_signed(chrono::Duration::days(offset))
                .unwrap_or(request.start_date());
            let jitter: f64 = rng.gen_range(0.9..=1.1);
            let recipient_name = if is_nj {
                (*name).to_string()
            } else {
                format!("{} Contractor {:02}", request.region(), i + 1)
            };
            AwardRecord {
                award_id: format!("SYN-{}-{:03}", request.region(), i + 1),
                recipient_name,
                total_obligation: (amount * jitter).round(),
                award_date,
                naics_description: (*naics).to_string(),
                awarding_agency: None,
            }
        })
        .collect();

    awards.sort_by(|a, b| {
        b.total_obligation
            .partial_cmp(&a.total_obligation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    AwardList {
        region: request.region().to_string(),
        awards,
        provenance: Provenance::Synthetic,
        source_name: SYNTHETIC_SOURCE.to_string(),
    }
}
