//! The acquisition service: the one entry point callers use.
//!
//! For each request exactly one of two paths runs:
//!
//! 1. provider → normalize → clip to range → native frequency (live data,
//!    `Provenance::Real`)
//! 2. synthesizer (`Provenance::Synthetic`)
//!
//! Path 2 runs whenever path 1 fails for any reason. The only errors surfaced to
//! the caller are `UnsupportedMetric`, and `MisconfiguredCredential` when the
//! deployment runs with [`FallbackPolicy::RealDataOnly`].

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::config::{AcquisitionConfig, FallbackPolicy};
use crate::data::bls::BlsClient;
use crate::data::fred::FredClient;
use crate::data::normalize::{align_to_frequency, normalize, normalize_awards};
use crate::data::provenance::{FailureKind, LogObserver, Outcome, ProvenanceObserver, ProvenanceRecord};
use crate::data::provider::ProviderClient;
use crate::data::raw::{RawProviderResponse, ResponseStatus};
use crate::data::sample::{generate_awards, generate_series};
use crate::data::spending::SpendingClient;
use crate::domain::{AwardList, MetricId, MetricRequest, MetricSeries, Provenance, ProviderKind};
use crate::error::AcquisitionError;

pub struct AcquisitionService {
    clients: Vec<Box<dyn ProviderClient>>,
    policy: FallbackPolicy,
    synth_seed: u64,
    observer: Box<dyn ProvenanceObserver>,
}

/// Why the live path was abandoned.
struct Fallback {
    source: Option<ProviderKind>,
    reason: FailureKind,
    detail: String,
}

impl AcquisitionService {
    /// Build a service with the three live clients described by `config`.
    pub fn new(config: &AcquisitionConfig) -> Result<Self, AcquisitionError> {
        let clients: Vec<Box<dyn ProviderClient>> = vec![
            Box::new(BlsClient::new(config.bls.clone())?),
            Box::new(FredClient::new(config.fred.clone())?),
            Box::new(SpendingClient::new(config.spending.clone())?),
        ];
        Ok(Self::with_clients(clients, config.policy, config.synth_seed))
    }

    /// Build a service over an arbitrary set of clients.
    pub fn with_clients(
        clients: Vec<Box<dyn ProviderClient>>,
        policy: FallbackPolicy,
        synth_seed: u64,
    ) -> Self {
        Self {
            clients,
            policy,
            synth_seed,
            observer: Box::new(LogObserver),
        }
    }

    /// Replace the default logging observer.
    pub fn with_observer(mut self, observer: Box<dyn ProvenanceObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    fn client_for(&self, metric: MetricId) -> Option<&dyn ProviderClient> {
        self.clients.iter().find(|c| c.supports(metric)).map(|c| c.as_ref())
    }

    /// Fetch one metric series, falling back to synthetic data on any failure.
    pub fn get_series(&self, request: &MetricRequest) -> Result<MetricSeries, AcquisitionError> {
        let metric = request.metric_id();

        let fallback = match self.client_for(metric) {
            None => Fallback {
                source: None,
                reason: FailureKind::NoProvider,
                detail: format!("No client registered for {metric}"),
            },
            Some(client) => {
                let raw = client.fetch(request)?;
                match self.live_series(request, &raw) {
                    Ok(series) => {
                        let n = series.points().len();
                        self.emit(request, Some(raw.provider), Outcome::Real, None, String::new(), n);
                        return Ok(series);
                    }
                    Err(fallback) => fallback,
                }
            }
        };

        let strict = self.policy == FallbackPolicy::RealDataOnly;
        if strict && fallback.reason == FailureKind::MisconfiguredCredential {
            self.emit(request, fallback.source, Outcome::Failed, Some(fallback.reason), fallback.detail, 0);
            return Err(AcquisitionError::MisconfiguredCredential {
                provider: fallback.source.map(|s| s.id()).unwrap_or("unknown").to_string(),
            });
        }

        match generate_series(request, self.synth_seed) {
            Ok(series) => {
                self.emit(
                    request,
                    fallback.source,
                    Outcome::Fallback,
                    Some(fallback.reason),
                    fallback.detail,
                    series.points().len(),
                );
                Ok(series)
            }
            Err(err) => {
                let detail = err.to_string();
                self.emit(request, fallback.source, Outcome::Failed, Some(fallback.reason), detail, 0);
                Err(err)
            }
        }
    }

    /// Convenience wrapper that parses the metric name first.
    pub fn get_series_by_name(
        &self,
        metric: &str,
        region: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MetricSeries, AcquisitionError> {
        let metric: MetricId = metric.parse()?;
        let request = MetricRequest::new(metric, region, start, end)?;
        self.get_series(&request)
    }

    /// Fetch several independent series concurrently, one task per request.
    ///
    /// Results are returned in request order.
    pub fn get_many(&self, requests: &[MetricRequest]) -> Vec<Result<MetricSeries, AcquisitionError>> {
        requests.par_iter().map(|r| self.get_series(r)).collect()
    }

    /// Top federal construction awards for a region, largest first.
    pub fn get_awards(
        &self,
        region: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<AwardList, AcquisitionError> {
        let request = MetricRequest::new(MetricId::FederalSpending, region, start, end)?;

        let fallback = match self.client_for(MetricId::FederalSpending) {
            None => Fallback {
                source: None,
                reason: FailureKind::NoProvider,
                detail: "No client registered for federal spending".to_string(),
            },
            Some(client) => {
                let raw = client.fetch(&request)?;
                match live_awards(&raw) {
                    Ok(awards) => {
                        let n = awards.len();
                        self.emit(&request, Some(raw.provider), Outcome::Real, None, String::new(), n);
                        return Ok(AwardList {
                            region: request.region().to_string(),
                            awards,
                            provenance: Provenance::Real,
                            source_name: raw.provider.display_name().to_string(),
                        });
                    }
                    Err(fallback) => fallback,
                }
            }
        };

        let list = generate_awards(&request, self.synth_seed);
        self.emit(
            &request,
            fallback.source,
            Outcome::Fallback,
            Some(fallback.reason),
            fallback.detail,
            list.awards.len(),
        );
        Ok(list)
    }

    fn live_series(
        &self,
        request: &MetricRequest,
        raw: &RawProviderResponse,
    ) -> Result<MetricSeries, Fallback> {
        if let Some(reason) = raw.status.failure_kind() {
            return Err(Fallback {
                source: Some(raw.provider),
                reason,
                detail: raw.status_detail.clone(),
            });
        }

        let mut points = normalize(raw, request.metric_id()).map_err(|e| Fallback {
            source: Some(raw.provider),
            reason: FailureKind::ProviderRejected,
            detail: e.to_string(),
        })?;
        points.retain(|p| request.contains(p.date));
        let points = align_to_frequency(points, request.metric_id().frequency());

        MetricSeries::new(
            request.metric_id(),
            request.region(),
            points,
            Provenance::Real,
            raw.provider.display_name(),
        )
        .map_err(|_| Fallback {
            source: Some(raw.provider),
            reason: FailureKind::EmptyResult,
            detail: "No usable observations in the requested range".to_string(),
        })
    }

    fn emit(
        &self,
        request: &MetricRequest,
        source: Option<ProviderKind>,
        outcome: Outcome,
        reason: Option<FailureKind>,
        detail: String,
        points: usize,
    ) {
        self.observer.record(&ProvenanceRecord {
            metric_id: request.metric_id(),
            region: request.region().to_string(),
            source,
            outcome,
            reason,
            detail,
            points,
        });
    }
}

fn live_awards(raw: &RawProviderResponse) -> Result<Vec<crate::domain::AwardRecord>, Fallback> {
    if raw.status != ResponseStatus::Success {
        return Err(Fallback {
            source: Some(raw.provider),
            reason: raw.status.failure_kind().unwrap_or(FailureKind::ProviderRejected),
            detail: raw.status_detail.clone(),
        });
    }
    let awards = normalize_awards(raw).map_err(|e| Fallback {
        source: Some(raw.provider),
        reason: FailureKind::ProviderRejected,
        detail: e.to_string(),
    })?;
    if awards.is_empty() {
        return Err(Fallback {
            source: Some(raw.provider),
            reason: FailureKind::EmptyResult,
            detail: "No award records with a usable amount and date".to_string(),
        });
    }
    Ok(awards)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::data::raw::{BlsDatum, BlsResponse, BlsResults, BlsSeries, ProviderPayload, Scalar};
    use crate::domain::ObservationPoint;

    type Responder = dyn Fn(&MetricRequest) -> RawProviderResponse + Send + Sync;

    struct StubClient {
        kind: ProviderKind,
        respond: Box<Responder>,
        calls: Arc<AtomicUsize>,
    }

    impl StubClient {
        fn new(
            kind: ProviderKind,
            respond: impl Fn(&MetricRequest) -> RawProviderResponse + Send + Sync + 'static,
        ) -> Self {
            Self {
                kind,
                respond: Box::new(respond),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ProviderClient for StubClient {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn fetch(&self, request: &MetricRequest) -> Result<RawProviderResponse, AcquisitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((self.respond)(request))
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<ProvenanceRecord>>>);

    impl ProvenanceObserver for Recorder {
        fn record(&self, record: &ProvenanceRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn q1_2020(metric: MetricId) -> MetricRequest {
        MetricRequest::new(metric, "NJ", d(2020, 1, 1), d(2020, 3, 1)).unwrap()
    }

    fn bls_success(request: &MetricRequest, data: &[(i32, &str, &str)]) -> RawProviderResponse {
        let body = BlsResponse {
            status: "REQUEST_SUCCEEDED".to_string(),
            message: Vec::new(),
            results: Some(BlsResults {
                series: vec![BlsSeries {
                    series_id: "LAUST340000000000003".to_string(),
                    data: data
                        .iter()
                        .map(|(year, period, value)| BlsDatum {
                            year: Scalar::Number(*year as f64),
                            period: period.to_string(),
                            value: Some(Scalar::Text(value.to_string())),
                        })
                        .collect(),
                }],
            }),
        };
        RawProviderResponse::success(ProviderKind::Bls, request.metric_id(), ProviderPayload::Bls(body))
    }

    fn failing(kind: ProviderKind, status: ResponseStatus) -> StubClient {
        StubClient::new(kind, move |r| {
            RawProviderResponse::failure(kind, r.metric_id(), status, format!("{status:?}"))
        })
    }

    #[test]
    fn duplicate_provider_dates_keep_first_value() {
        let stub = StubClient::new(ProviderKind::Bls, |r| {
            bls_success(r, &[(2020, "M01", "5.1"), (2020, "M01", "5.9")])
        });
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42);

        let series = service.get_series(&q1_2020(MetricId::UnemploymentRate)).unwrap();
        assert_eq!(series.provenance(), Provenance::Real);
        assert_eq!(series.points(), &[ObservationPoint::new(d(2020, 1, 1), 5.1)]);
        assert_eq!(series.source_name(), "Bureau of Labor Statistics");
    }

    #[test]
    fn http_500_falls_back_to_three_monthly_points() {
        let recorder = Recorder::default();
        let service = AcquisitionService::with_clients(
            vec![Box::new(failing(ProviderKind::Bls, ResponseStatus::HttpError))],
            FallbackPolicy::AlwaysShow,
            42,
        )
        .with_observer(Box::new(recorder.clone()));

        let series = service.get_series(&q1_2020(MetricId::UnemploymentRate)).unwrap();
        assert_eq!(series.provenance(), Provenance::Synthetic);
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1)]);

        let records = recorder.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, Outcome::Fallback);
        assert_eq!(records[0].reason, Some(FailureKind::ProviderRejected));
        assert_eq!(records[0].source, Some(ProviderKind::Bls));
    }

    #[test]
    fn every_failure_status_falls_back_without_error() {
        for status in [
            ResponseStatus::HttpError,
            ResponseStatus::ProviderError,
            ResponseStatus::Empty,
            ResponseStatus::NotConfigured,
            ResponseStatus::TransportFailure,
        ] {
            let service = AcquisitionService::with_clients(
                vec![Box::new(failing(ProviderKind::Fred, status))],
                FallbackPolicy::AlwaysShow,
                42,
            );
            let series = service.get_series(&q1_2020(MetricId::Cpi)).unwrap();
            assert!(series.is_synthetic(), "{status:?} should fall back");
        }
    }

    #[test]
    fn placeholder_key_under_real_data_only_is_an_error() {
        let recorder = Recorder::default();
        let service = AcquisitionService::with_clients(
            vec![Box::new(failing(ProviderKind::Fred, ResponseStatus::NotConfigured))],
            FallbackPolicy::RealDataOnly,
            42,
        )
        .with_observer(Box::new(recorder.clone()));

        let err = service.get_series(&q1_2020(MetricId::Cpi)).unwrap_err();
        assert!(matches!(
            err,
            AcquisitionError::MisconfiguredCredential { ref provider } if provider == "FRED"
        ));
        assert_eq!(recorder.0.lock().unwrap()[0].outcome, Outcome::Failed);
    }

    #[test]
    fn real_fred_client_with_placeholder_key() {
        let config = AcquisitionConfig::default();

        let always = AcquisitionService::new(&config).unwrap();
        let series = always.get_series(&q1_2020(MetricId::Cpi)).unwrap();
        assert!(series.is_synthetic());

        let strict = AcquisitionService::new(&AcquisitionConfig {
            policy: FallbackPolicy::RealDataOnly,
            ..config
        })
        .unwrap();
        assert!(matches!(
            strict.get_series(&q1_2020(MetricId::Cpi)),
            Err(AcquisitionError::MisconfiguredCredential { .. })
        ));
    }

    #[test]
    fn other_failures_still_fall_back_under_real_data_only() {
        let service = AcquisitionService::with_clients(
            vec![Box::new(failing(ProviderKind::Bls, ResponseStatus::TransportFailure))],
            FallbackPolicy::RealDataOnly,
            42,
        );
        assert!(service.get_series(&q1_2020(MetricId::LaborForce)).unwrap().is_synthetic());
    }

    #[test]
    fn points_outside_range_do_not_count() {
        let stub = StubClient::new(ProviderKind::Bls, |r| bls_success(r, &[(2019, "M06", "4.0")]));
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42);
        let series = service.get_series(&q1_2020(MetricId::UnemploymentRate)).unwrap();
        assert!(series.is_synthetic());
    }

    #[test]
    fn unparseable_values_only_means_empty_result() {
        let recorder = Recorder::default();
        let stub = StubClient::new(ProviderKind::Bls, |r| {
            bls_success(r, &[(2020, "M01", "n/a"), (2020, "M13", "5.0")])
        });
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42)
            .with_observer(Box::new(recorder.clone()));
        assert!(service.get_series(&q1_2020(MetricId::UnemploymentRate)).unwrap().is_synthetic());
        assert_eq!(recorder.0.lock().unwrap()[0].reason, Some(FailureKind::EmptyResult));
    }

    #[test]
    fn exactly_one_fetch_per_request() {
        let stub = failing(ProviderKind::Bls, ResponseStatus::HttpError);
        let calls = Arc::clone(&stub.calls);
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42);
        service.get_series(&q1_2020(MetricId::LaborForce)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_client_falls_back() {
        let service = AcquisitionService::with_clients(Vec::new(), FallbackPolicy::AlwaysShow, 42);
        for metric in MetricId::ALL {
            let series = service.get_series(&q1_2020(metric)).unwrap();
            assert!(series.is_synthetic());
            assert!(!series.points().is_empty());
        }
    }

    #[test]
    fn unknown_metric_name_is_unsupported() {
        let service = AcquisitionService::with_clients(Vec::new(), FallbackPolicy::AlwaysShow, 42);
        let err = service
            .get_series_by_name("gdp_growth", "NJ", d(2020, 1, 1), d(2020, 3, 1))
            .unwrap_err();
        assert!(matches!(err, AcquisitionError::UnsupportedMetric(_)));
    }

    #[test]
    fn get_many_keeps_request_order() {
        let service = AcquisitionService::with_clients(
            vec![Box::new(failing(ProviderKind::Bls, ResponseStatus::Empty))],
            FallbackPolicy::AlwaysShow,
            42,
        );
        let requests: Vec<_> = MetricId::ALL.into_iter().map(q1_2020).collect();
        let results = service.get_many(&requests);
        let metrics: Vec<_> = results.iter().map(|r| r.as_ref().unwrap().metric_id()).collect();
        assert_eq!(metrics, MetricId::ALL.to_vec());
    }

    #[test]
    fn awards_fall_back_when_spending_is_empty() {
        let service = AcquisitionService::with_clients(
            vec![Box::new(failing(ProviderKind::UsaSpending, ResponseStatus::Empty))],
            FallbackPolicy::AlwaysShow,
            42,
        );
        let list = service.get_awards("NJ", d(2023, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(list.provenance, Provenance::Synthetic);
        assert!(!list.awards.is_empty());
    }

    #[test]
    fn monthly_wage_payload_is_served_quarterly() {
        let months: Vec<(i32, &str, &str)> = vec![
            (2020, "M01", "35.10"),
            (2020, "M02", "35.20"),
            (2020, "M03", "35.30"),
            (2020, "M04", "35.40"),
            (2020, "M05", "35.50"),
            (2020, "M06", "35.60"),
        ];
        let stub = StubClient::new(ProviderKind::Bls, move |r| bls_success(r, &months));
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42);

        let request =
            MetricRequest::new(MetricId::ConstructionWages, "NJ", d(2020, 1, 1), d(2020, 6, 30)).unwrap();
        let series = service.get_series(&request).unwrap();
        assert_eq!(series.provenance(), Provenance::Real);
        assert_eq!(
            series.points(),
            &[ObservationPoint::new(d(2020, 1, 1), 35.10), ObservationPoint::new(d(2020, 4, 1), 35.40)]
        );

        // Same dates as the synthetic fallback for this request.
        let synthetic = generate_series(&request, 42).unwrap();
        let synthetic_dates: Vec<_> = synthetic.points().iter().map(|p| p.date).collect();
        let real_dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(real_dates, synthetic_dates);
    }

    #[test]
    fn wage_range_without_quarter_start_stays_monthly() {
        let stub = StubClient::new(ProviderKind::Bls, |r| {
            bls_success(r, &[(2020, "M01", "35.1"), (2020, "M02", "35.2"), (2020, "M03", "35.3")])
        });
        let service = AcquisitionService::with_clients(vec![Box::new(stub)], FallbackPolicy::AlwaysShow, 42);
        let request =
            MetricRequest::new(MetricId::ConstructionWages, "NJ", d(2020, 2, 1), d(2020, 3, 31)).unwrap();
        let series = service.get_series(&request).unwrap();
        assert!(!series.is_synthetic());
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2020, 2, 1), d(2020, 3, 1)]);
    }
}
