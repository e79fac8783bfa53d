//! Series normalization: provider payloads → ordered `ObservationPoint`s.
//!
//! Rules applied to every payload:
//!
//! - one date per period, always the first day of the period
//! - unrecognized periods and non-numeric values skip the point; nothing is
//!   ever coerced to zero
//! - duplicate dates keep the first observation encountered, in payload order
//! - output is sorted ascending by date (downstream percent-change math relies
//!   on adjacent indices being adjacent periods)

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::raw::{
    BlsResponse, FredResponse, ProviderPayload, RawProviderResponse, ResponseStatus, Scalar, SpendingResponse,
};
use crate::domain::calendar::{is_quarter_start, month_start};
use crate::domain::{AwardRecord, Frequency, MetricId, ObservationPoint};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Provider response was not successful ({status:?}): {detail}")]
    Unsuccessful { status: ResponseStatus, detail: String },

    #[error("Payload is for {found}, expected {expected}")]
    MetricMismatch { expected: MetricId, found: MetricId },

    #[error("Response for {0} carries no payload")]
    MissingPayload(MetricId),
}

/// Normalize a successful provider response into a canonical point sequence.
pub fn normalize(
    raw: &RawProviderResponse,
    expected: MetricId,
) -> Result<Vec<ObservationPoint>, NormalizeError> {
    check(raw, expected)?;

    let points = match &raw.payload {
        ProviderPayload::Bls(body) => bls_points(body),
        ProviderPayload::Fred(body) => fred_points(body),
        ProviderPayload::Spending(body) => spending_points(body),
        ProviderPayload::None => return Err(NormalizeError::MissingPayload(expected)),
    };

    Ok(canonicalize(points))
}

/// Award records from a successful spending response, largest obligation first.
///
/// Records without a parseable obligation or date are skipped.
pub fn normalize_awards(raw: &RawProviderResponse) -> Result<Vec<AwardRecord>, NormalizeError> {
    check(raw, MetricId::FederalSpending)?;
    let ProviderPayload::Spending(body) = &raw.payload else {
        return Err(NormalizeError::MissingPayload(MetricId::FederalSpending));
    };

    let mut awards: Vec<AwardRecord> = body
        .results
        .iter()
        .filter_map(|r| {
            let total_obligation = r.total_obligation.as_ref()?.as_f64()?;
            let award_date = parse_date(r.award_date.as_deref()?)?;
            Some(AwardRecord {
                award_id: r.award_id.as_ref().map(Scalar::to_text).unwrap_or_default(),
                recipient_name: r.recipient_name.clone().unwrap_or_else(|| "Unknown recipient".to_string()),
                total_obligation,
                award_date,
                naics_description: r.naics_description.clone().unwrap_or_default(),
                awarding_agency: r.awarding_agency_name.clone(),
            })
        })
        .collect();

    awards.sort_by(|a, b| {
        b.total_obligation
            .partial_cmp(&a.total_obligation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(awards)
}

/// Drop non-finite values, keep the first point per date, sort ascending.
///
/// Idempotent: canonicalizing a canonical sequence returns it unchanged.
pub fn canonicalize(points: Vec<ObservationPoint>) -> Vec<ObservationPoint> {
    let mut seen = HashSet::with_capacity(points.len());
    let mut out: Vec<ObservationPoint> = points
        .into_iter()
        .filter(|p| p.value.is_finite())
        .filter(|p| seen.insert(p.date))
        .collect();
    // Dates are unique at this point, so an unstable sort is deterministic.
    out.sort_unstable_by_key(|p| p.date);
    out
}

/// Thin a canonical sequence down to the metric's native frequency.
///
/// Quarterly metrics keep only quarter-start months. A sequence with no
/// quarter start at all is returned as-is, the same way the synthesizer
/// degrades to monthly for ranges that hold no quarter start.
pub fn align_to_frequency(
    points: Vec<ObservationPoint>,
    frequency: Frequency,
) -> Vec<ObservationPoint> {
    match frequency {
        Frequency::Monthly => points,
        Frequency::Quarterly => {
            if !points.iter().any(|p| is_quarter_start(p.date)) {
                return points;
            }
            points.into_iter().filter(|p| is_quarter_start(p.date)).collect()
        }
    }
}

/// BLS period code → first day of the period.
///
/// `M01`..`M12` are months; `Q01`..`Q04` are quarters. Annual averages
/// (`M13`, `Q05`), semiannual (`S01`..`S03`) and anything else are rejected.
pub fn period_start(year: i32, period: &str) -> Option<NaiveDate> {
    let period = period.trim();
    let (kind, number) = period.split_at_checked(1)?;
    let n: u32 = number.parse().ok()?;
    let month = match kind {
        "M" if (1..=12).contains(&n) => n,
        "Q" if (1..=4).contains(&n) => (n - 1) * 3 + 1,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn check(raw: &RawProviderResponse, expected: MetricId) -> Result<(), NormalizeError> {
    if raw.status != ResponseStatus::Success {
        return Err(NormalizeError::Unsuccessful {
            status: raw.status,
            detail: raw.status_detail.clone(),
        });
    }
    if raw.metric_id != expected {
        return Err(NormalizeError::MetricMismatch {
            expected,
            found: raw.metric_id,
        });
    }
    Ok(())
}

fn bls_points(body: &BlsResponse) -> Vec<ObservationPoint> {
    let Some(results) = &body.results else {
        return Vec::new();
    };
    results
        .series
        .iter()
        .flat_map(|series| series.data.iter())
        .filter_map(|datum| {
            let year = datum.year.as_i32()?;
            let date = period_start(year, &datum.period)?;
            let value = datum.value.as_ref()?.as_f64()?;
            Some(ObservationPoint::new(date, value))
        })
        .collect()
}

fn fred_points(body: &FredResponse) -> Vec<ObservationPoint> {
    body.observations
        .iter()
        .filter_map(|obs| {
            let date = parse_date(&obs.date)?;
            let value = obs.value.as_ref()?.as_f64()?;
            Some(ObservationPoint::new(month_start(date), value))
        })
        .collect()
}

/// Awards are bucketed by month and their obligations summed; buckets appear
/// in order of first award seen.
fn spending_points(body: &SpendingResponse) -> Vec<ObservationPoint> {
    let mut buckets: Vec<ObservationPoint> = Vec::new();
    for award in &body.results {
        let Some(date) = award.award_date.as_deref().and_then(parse_date) else {
            continue;
        };
        let Some(amount) = award.total_obligation.as_ref().and_then(|v| v.as_f64()) else {
            continue;
        };
        let month = month_start(date);
        match buckets.iter_mut().find(|p| p.date == month) {
            Some(bucket) => bucket.value += amount,
            None => buckets.push(ObservationPoint::new(month, amount)),
        }
    }
    buckets
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::{BlsDatum, BlsResults, BlsSeries, FredObservation, SpendingAward};
    use crate::domain::ProviderKind;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn datum(year: i32, period: &str, value: &str) -> BlsDatum {
        BlsDatum {
            year: Scalar::Number(year as f64),
            period: period.to_string(),
            value: Some(Scalar::Text(value.to_string())),
        }
    }

    fn bls_raw(metric: MetricId, series: Vec<Vec<BlsDatum>>) -> RawProviderResponse {
        let body = BlsResponse {
            status: "REQUEST_SUCCEEDED".to_string(),
            message: Vec::new(),
            results: Some(BlsResults {
                series: series
                    .into_iter()
                    .enumerate()
                    .map(|(i, data)| BlsSeries {
                        series_id: format!("S{i}"),
                        data,
                    })
                    .collect(),
            }),
        };
        RawProviderResponse::success(ProviderKind::Bls, metric, ProviderPayload::Bls(body))
    }

    #[test]
    fn duplicate_dates_keep_first_value() {
        let raw = bls_raw(
            MetricId::UnemploymentRate,
            vec![vec![datum(2020, "M01", "5.1"), datum(2020, "M01", "5.9")]],
        );
        let points = normalize(&raw, MetricId::UnemploymentRate).unwrap();
        assert_eq!(points, vec![ObservationPoint::new(d(2020, 1), 5.1)]);
    }

    #[test]
    fn duplicates_across_merged_series_keep_first_series() {
        let raw = bls_raw(
            MetricId::ConstructionEmployment,
            vec![
                vec![datum(2020, "M02", "150.0")],
                vec![datum(2020, "M02", "999.0"), datum(2020, "M01", "149.0")],
            ],
        );
        let points = normalize(&raw, MetricId::ConstructionEmployment).unwrap();
        assert_eq!(
            points,
            vec![ObservationPoint::new(d(2020, 1), 149.0), ObservationPoint::new(d(2020, 2), 150.0)]
        );
    }

    #[test]
    fn bls_sorts_ascending_and_skips_bad_points() {
        let raw = bls_raw(
            MetricId::ConstructionWages,
            vec![vec![
                datum(2020, "M03", "36.2"),
                datum(2020, "M13", "35.9"),
                datum(2020, "M02", "-"),
                datum(2020, "Q05", "35.0"),
                datum(2020, "M01", "abc"),
                datum(2019, "Q04", "34.8"),
                datum(2020, "S01", "35.5"),
            ]],
        );
        let points = normalize(&raw, MetricId::ConstructionWages).unwrap();
        assert_eq!(
            points,
            vec![ObservationPoint::new(d(2019, 10), 34.8), ObservationPoint::new(d(2020, 3), 36.2)]
        );
    }

    #[test]
    fn period_codes() {
        assert_eq!(period_start(2020, "M01"), Some(d(2020, 1)));
        assert_eq!(period_start(2020, "M12"), Some(d(2020, 12)));
        assert_eq!(period_start(2020, "Q02"), Some(d(2020, 4)));
        assert_eq!(period_start(2020, "M13"), None);
        assert_eq!(period_start(2020, "M00"), None);
        assert_eq!(period_start(2020, "A01"), None);
        assert_eq!(period_start(2020, ""), None);
    }

    #[test]
    fn fred_missing_marker_is_dropped_not_zeroed() {
        let body = FredResponse {
            observations: vec![
                FredObservation {
                    date: "2020-01-01".to_string(),
                    value: Some(Scalar::Text("258.7".to_string())),
                },
                FredObservation {
                    date: "2020-02-01".to_string(),
                    value: Some(Scalar::Text(".".to_string())),
                },
                FredObservation {
                    date: "not-a-date".to_string(),
                    value: Some(Scalar::Text("1.0".to_string())),
                },
            ],
            error_message: None,
        };
        let raw =
            RawProviderResponse::success(ProviderKind::Fred, MetricId::Cpi, ProviderPayload::Fred(body));
        let points = normalize(&raw, MetricId::Cpi).unwrap();
        assert_eq!(points, vec![ObservationPoint::new(d(2020, 1), 258.7)]);
    }

    #[test]
    fn spending_buckets_by_month() {
        let award = |date: &str, amount: &str| SpendingAward {
            award_id: None,
            recipient_name: Some("Earlco Construction".to_string()),
            total_obligation: Some(Scalar::Text(amount.to_string())),
            award_date: Some(date.to_string()),
            naics_description: None,
            awarding_agency_name: None,
        };
        let body = SpendingResponse {
            results: vec![
                award("2023-03-14", "100.0"),
                award("2023-01-02", "50.0"),
                award("2023-03-30", "25.0"),
                award("2023-02-10", "oops"),
            ],
            detail: None,
        };
        let raw = RawProviderResponse::success(
            ProviderKind::UsaSpending,
            MetricId::FederalSpending,
            ProviderPayload::Spending(body),
        );
        let points = normalize(&raw, MetricId::FederalSpending).unwrap();
        assert_eq!(
            points,
            vec![ObservationPoint::new(d(2023, 1), 50.0), ObservationPoint::new(d(2023, 3), 125.0)]
        );

        let awards = normalize_awards(&raw).unwrap();
        assert_eq!(awards.len(), 3);
        assert_eq!(awards[0].total_obligation, 100.0);
        assert_eq!(awards[2].total_obligation, 25.0);
    }

    #[test]
    fn rejects_unsuccessful_and_mismatched_responses() {
        let raw = RawProviderResponse::failure(
            ProviderKind::Bls,
            MetricId::LaborForce,
            ResponseStatus::HttpError,
            "HTTP 500",
        );
        assert!(matches!(
            normalize(&raw, MetricId::LaborForce),
            Err(NormalizeError::Unsuccessful { status: ResponseStatus::HttpError, .. })
        ));

        let raw = bls_raw(MetricId::LaborForce, vec![vec![datum(2020, "M01", "1.0")]]);
        assert!(matches!(
            normalize(&raw, MetricId::UnemploymentRate),
            Err(NormalizeError::MetricMismatch { .. })
        ));
    }

    #[test]
    fn canonicalize_is_idempotent_and_unique() {
        let messy = vec![
            ObservationPoint::new(d(2020, 3), 3.0),
            ObservationPoint::new(d(2020, 1), 1.0),
            ObservationPoint::new(d(2020, 3), 9.0),
            ObservationPoint::new(d(2020, 2), f64::NAN),
            ObservationPoint::new(d(2020, 2), f64::INFINITY),
            ObservationPoint::new(d(2020, 2), 2.0),
        ];
        let once = canonicalize(messy);
        assert_eq!(
            once,
            vec![
                ObservationPoint::new(d(2020, 1), 1.0),
                ObservationPoint::new(d(2020, 2), 2.0),
                ObservationPoint::new(d(2020, 3), 3.0),
            ]
        );
        assert_eq!(canonicalize(once.clone()), once);
    }

    #[test]
    fn quarterly_alignment_keeps_quarter_starts() {
        let monthly: Vec<_> = (1..=6).map(|m| ObservationPoint::new(d(2020, m), 30.0 + m as f64)).collect();
        let aligned = align_to_frequency(monthly.clone(), Frequency::Quarterly);
        let dates: Vec<_> = aligned.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2020, 1), d(2020, 4)]);
        assert_eq!(aligned[1].value, 34.0);

        assert_eq!(align_to_frequency(monthly.clone(), Frequency::Monthly), monthly);

        let no_quarter_start = vec![
            ObservationPoint::new(d(2020, 2), 31.0),
            ObservationPoint::new(d(2020, 3), 32.0),
        ];
        assert_eq!(align_to_frequency(no_quarter_start.clone(), Frequency::Quarterly), no_quarter_start);
    }
}
