//! Reporting utilities: period-over-period changes, series summaries, and the
//! dashboard headline figures.
//!
//! Everything here is pure computation over already-acquired data, so it is
//! the same whether a series came from a live provider or the synthesizer.

use serde::Serialize;

use crate::domain::{AwardList, MetricId, MetricSeries, Provenance};

pub mod format;

pub use format::*;

/// Percent change of each point against the previous one.
///
/// The first point has no predecessor, and a zero predecessor has no defined
/// change; both yield `None`.
pub fn percent_changes(series: &MetricSeries) -> Vec<Option<f64>> {
    let points = series.points();
    let mut out = Vec::with_capacity(points.len());
    out.push(None);
    for w in points.windows(2) {
        let (prev, cur) = (w[0].value, w[1].value);
        out.push((prev != 0.0).then(|| (cur - prev) / prev * 100.0));
    }
    out.truncate(points.len());
    out
}

/// Descriptive statistics for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub metric_id: MetricId,
    pub region: String,
    pub provenance: Provenance,
    pub source_name: String,
    pub n_points: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: f64,
    pub latest: f64,
    /// Change from the first to the latest point, in percent.
    pub total_change_pct: Option<f64>,
}

pub fn summarize(series: &MetricSeries) -> SeriesSummary {
    let values: Vec<f64> = series.points().iter().map(|p| p.value).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let first = series.first().value;
    let latest = series.latest().value;

    SeriesSummary {
        metric_id: series.metric_id(),
        region: series.region().to_string(),
        provenance: series.provenance(),
        source_name: series.source_name().to_string(),
        n_points: values.len(),
        min,
        max,
        mean,
        first,
        latest,
        total_change_pct: (first != 0.0).then(|| (latest - first) / first * 100.0),
    }
}

/// One headline figure plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub value: Option<f64>,
    pub provenance: Option<Provenance>,
}

impl Card {
    fn missing() -> Self {
        Self {
            value: None,
            provenance: None,
        }
    }

    fn latest_of(series: Option<&MetricSeries>) -> Self {
        match series {
            Some(s) => Self {
                value: Some(s.latest().value),
                provenance: Some(s.provenance()),
            },
            None => Self::missing(),
        }
    }
}

/// The overview cards: employment, growth, wages, unemployment, labor force,
/// spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub region: String,
    pub employment: Card,
    /// Employment change over the whole range, in percent.
    pub employment_growth_pct: Card,
    pub average_wage: Card,
    pub unemployment_rate: Card,
    pub labor_force: Card,
    pub total_spending: Card,
    pub contract_count: usize,
}

impl DashboardSummary {
    /// Build the cards from whatever series are available.
    ///
    /// Series are matched by metric id; a metric that is absent (its request
    /// failed) leaves its card empty rather than failing the whole dashboard.
    pub fn build(region: &str, series: &[MetricSeries], awards: Option<&AwardList>) -> Self {
        let find = |metric: MetricId| series.iter().find(|s| s.metric_id() == metric);

        let employment_series = find(MetricId::ConstructionEmployment);
        let employment_growth_pct = match employment_series {
            Some(s) => Card {
                value: summarize(s).total_change_pct,
                provenance: Some(s.provenance()),
            },
            None => Card::missing(),
        };

        let total_spending = match awards {
            Some(list) => Card {
                value: Some(list.total_obligation()),
                provenance: Some(list.provenance),
            },
            None => Card::missing(),
        };

        Self {
            region: region.to_string(),
            employment: Card::latest_of(employment_series),
            employment_growth_pct,
            average_wage: Card::latest_of(find(MetricId::ConstructionWages)),
            unemployment_rate: Card::latest_of(find(MetricId::UnemploymentRate)),
            labor_force: Card::latest_of(find(MetricId::LaborForce)),
            total_spending,
            contract_count: awards.map(|a| a.awards.len()).unwrap_or(0),
        }
    }

    /// True if any populated card is backed by synthetic data.
    pub fn any_synthetic(&self) -> bool {
        [
            &self.employment,
            &self.employment_growth_pct,
            &self.average_wage,
            &self.unemployment_rate,
            &self.labor_force,
            &self.total_spending,
        ]
        .iter()
        .any(|c| c.provenance == Some(Provenance::Synthetic))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{AwardRecord, ObservationPoint};

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn series(metric: MetricId, values: &[f64], provenance: Provenance) -> MetricSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| ObservationPoint::new(d(2020, i as u32 + 1), *v))
            .collect();
        MetricSeries::new(metric, "NJ", points, provenance, "test").unwrap()
    }

    #[test]
    fn percent_changes_handle_first_and_zero() {
        let s = series(MetricId::Cpi, &[100.0, 110.0, 0.0, 5.0], Provenance::Real);
        let changes = percent_changes(&s);
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - 10.0).abs() < 1e-9);
        assert!((changes[2].unwrap() + 100.0).abs() < 1e-9);
        assert_eq!(changes[3], None);
    }

    #[test]
    fn single_point_series_has_one_change_entry() {
        let s = series(MetricId::Cpi, &[100.0], Provenance::Real);
        assert_eq!(percent_changes(&s), vec![None]);
    }

    #[test]
    fn summarize_basic() {
        let s = series(MetricId::ConstructionEmployment, &[100.0, 90.0, 120.0], Provenance::Real);
        let summary = summarize(&s);
        assert_eq!(summary.n_points, 3);
        assert_eq!(summary.min, 90.0);
        assert_eq!(summary.max, 120.0);
        assert!((summary.mean - 310.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.first, 100.0);
        assert_eq!(summary.latest, 120.0);
        assert!((summary.total_change_pct.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn dashboard_tags_each_card() {
        let all = vec![
            series(MetricId::ConstructionEmployment, &[100.0, 110.0], Provenance::Real),
            series(MetricId::UnemploymentRate, &[5.0, 4.8], Provenance::Synthetic),
            series(MetricId::LaborForce, &[4_500_000.0, 4_510_000.0], Provenance::Real),
        ];
        let awards = AwardList {
            region: "NJ".to_string(),
            awards: vec![AwardRecord {
                award_id: "A1".to_string(),
                recipient_name: "Earlco Construction".to_string(),
                total_obligation: 2_000_000.0,
                award_date: d(2020, 3),
                naics_description: "Heavy Construction".to_string(),
                awarding_agency: None,
            }],
            provenance: Provenance::Real,
            source_name: "USAspending.gov".to_string(),
        };

        let dash = DashboardSummary::build("NJ", &all, Some(&awards));
        assert_eq!(dash.employment.value, Some(110.0));
        assert!((dash.employment_growth_pct.value.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(dash.unemployment_rate.provenance, Some(Provenance::Synthetic));
        assert_eq!(dash.average_wage, Card::missing());
        assert_eq!(dash.labor_force.value, Some(4_510_000.0));
        assert_eq!(dash.labor_force.provenance, Some(Provenance::Real));
        assert_eq!(dash.total_spending.value, Some(2_000_000.0));
        assert_eq!(dash.contract_count, 1);
        assert!(dash.any_synthetic());
    }
}
