//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - handed to a presentation layer as-is
//! - exported to JSON/CSV
//! - compared in tests without any network access

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::month_start;
use crate::error::AcquisitionError;

/// External data source a metric is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Bureau of Labor Statistics public API (labor statistics).
    Bls,
    /// FRED (economic indicators).
    Fred,
    /// USAspending.gov (federal contract awards).
    UsaSpending,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::Bls, ProviderKind::Fred, ProviderKind::UsaSpending];

    /// Short identifier used in logs and provenance records.
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Bls => "BLS",
            ProviderKind::Fred => "FRED",
            ProviderKind::UsaSpending => "USASPENDING",
        }
    }

    /// Human-readable source name shown next to real data.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Bls => "Bureau of Labor Statistics",
            ProviderKind::Fred => "Federal Reserve Economic Data",
            ProviderKind::UsaSpending => "USAspending.gov",
        }
    }
}

/// Native sampling frequency of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Length of one period in months.
    pub fn months(self) -> u32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
        }
    }
}

/// The fixed set of metrics the dashboards track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum MetricId {
    ConstructionEmployment,
    ConstructionWages,
    UnemploymentRate,
    LaborForce,
    FederalSpending,
    Cpi,
    PpiConstruction,
    InterestRate,
}

impl MetricId {
    pub const ALL: [MetricId; 8] = [
        MetricId::ConstructionEmployment,
        MetricId::ConstructionWages,
        MetricId::UnemploymentRate,
        MetricId::LaborForce,
        MetricId::FederalSpending,
        MetricId::Cpi,
        MetricId::PpiConstruction,
        MetricId::InterestRate,
    ];

    /// Stable snake_case name (wire/CLI form).
    pub fn as_str(self) -> &'static str {
        match self {
            MetricId::ConstructionEmployment => "construction_employment",
            MetricId::ConstructionWages => "construction_wages",
            MetricId::UnemploymentRate => "unemployment_rate",
            MetricId::LaborForce => "labor_force",
            MetricId::FederalSpending => "federal_spending",
            MetricId::Cpi => "cpi",
            MetricId::PpiConstruction => "ppi_construction",
            MetricId::InterestRate => "interest_rate",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            MetricId::ConstructionEmployment => "Construction Employment",
            MetricId::ConstructionWages => "Construction Avg Hourly Earnings",
            MetricId::UnemploymentRate => "Unemployment Rate",
            MetricId::LaborForce => "Labor Force",
            MetricId::FederalSpending => "Federal Construction Spending",
            MetricId::Cpi => "Consumer Price Index",
            MetricId::PpiConstruction => "Producer Price Index (Final Demand)",
            MetricId::InterestRate => "Federal Funds Rate",
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            MetricId::ConstructionEmployment | MetricId::LaborForce => "persons",
            MetricId::ConstructionWages => "USD/hour",
            MetricId::UnemploymentRate | MetricId::InterestRate => "%",
            MetricId::FederalSpending => "USD",
            MetricId::Cpi | MetricId::PpiConstruction => "index",
        }
    }

    /// Which external source serves this metric.
    pub fn provider(self) -> ProviderKind {
        match self {
            MetricId::ConstructionEmployment
            | MetricId::ConstructionWages
            | MetricId::UnemploymentRate
            | MetricId::LaborForce => ProviderKind::Bls,
            MetricId::Cpi | MetricId::PpiConstruction | MetricId::InterestRate => ProviderKind::Fred,
            MetricId::FederalSpending => ProviderKind::UsaSpending,
        }
    }

    /// Wage-type metrics are reported quarterly; everything else monthly.
    pub fn frequency(self) -> Frequency {
        match self {
            MetricId::ConstructionWages => Frequency::Quarterly,
            _ => Frequency::Monthly,
        }
    }

    /// Counts, wages, prices and unemployment cannot go below zero.
    ///
    /// Policy rates can, so `interest_rate` is the one exception.
    pub fn non_negative(self) -> bool {
        !matches!(self, MetricId::InterestRate)
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricId {
    type Err = AcquisitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MetricId::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AcquisitionError::UnsupportedMetric(needle.to_string()))
    }
}

/// What a caller wants: one metric, one region, one date range.
///
/// Requests are month-granular: the start date is floored to the first of its
/// month so every valid range covers at least one monthly period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricRequest {
    metric_id: MetricId,
    region: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl MetricRequest {
    pub fn new(
        metric_id: MetricId,
        region: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, AcquisitionError> {
        if start_date > end_date {
            return Err(AcquisitionError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        Ok(Self {
            metric_id,
            region: region.into().trim().to_ascii_uppercase(),
            start_date: month_start(start_date),
            end_date,
        })
    }

    pub fn metric_id(&self) -> MetricId {
        self.metric_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// True if `date` lies within `[start_date, end_date]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// One dated numeric sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl ObservationPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Whether a series came from a live source or was generated as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Real,
    Synthetic,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Real => f.write_str("real"),
            Provenance::Synthetic => f.write_str("synthetic"),
        }
    }
}

/// The unit returned to callers.
///
/// Points are sorted ascending by date with unique dates, and a series is never
/// empty: [`MetricSeries::new`] refuses to build one without observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    metric_id: MetricId,
    region: String,
    points: Vec<ObservationPoint>,
    provenance: Provenance,
    source_name: String,
}

impl MetricSeries {
    pub fn new(
        metric_id: MetricId,
        region: impl Into<String>,
        points: Vec<ObservationPoint>,
        provenance: Provenance,
        source_name: impl Into<String>,
    ) -> Result<Self, AcquisitionError> {
        let region = region.into();
        if points.is_empty() {
            return Err(AcquisitionError::NoObservations {
                metric: metric_id.to_string(),
                region,
            });
        }
        Ok(Self {
            metric_id,
            region,
            points,
            provenance,
            source_name: source_name.into(),
        })
    }

    pub fn metric_id(&self) -> MetricId {
        self.metric_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn points(&self) -> &[ObservationPoint] {
        &self.points
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }

    /// Most recent observation (series are never empty).
    pub fn latest(&self) -> &ObservationPoint {
        &self.points[self.points.len() - 1]
    }

    pub fn first(&self) -> &ObservationPoint {
        &self.points[0]
    }
}

/// One federal contract award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub award_id: String,
    pub recipient_name: String,
    pub total_obligation: f64,
    pub award_date: NaiveDate,
    pub naics_description: String,
    pub awarding_agency: Option<String>,
}

/// Contract awards for a region, largest obligation first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwardList {
    pub region: String,
    pub awards: Vec<AwardRecord>,
    pub provenance: Provenance,
    pub source_name: String,
}

impl AwardList {
    pub fn total_obligation(&self) -> f64 {
        self.awards.iter().map(|a| a.total_obligation).sum()
    }
}
