//! Acquisition configuration.
//!
//! All endpoints, keys, timeouts and page sizes live in one explicit object
//! that is handed to the service at construction time. Nothing here is
//! hardcoded beyond public endpoints and placeholder sentinels.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::ProviderKind;
use crate::error::AcquisitionError;

pub const BLS_ENDPOINT: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
pub const FRED_ENDPOINT: &str = "https://api.stlouisfed.org/fred/series/observations";
pub const USASPENDING_ENDPOINT: &str = "https://api.usaspending.gov/api/v2/search/spending_by_award/";

/// Placeholder values shipped in sample `.env` files; treated as "no key".
pub const BLS_KEY_PLACEHOLDER: &str = "YOUR_BLS_API_KEY_HERE";
pub const FRED_KEY_PLACEHOLDER: &str = "YOUR_FRED_API_KEY_HERE";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_LIMIT: usize = 100;
/// USAspending rejects page sizes above this.
pub const MAX_PAGE_LIMIT: usize = 100;

/// What to do when live data is unavailable because a key is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Substitute synthetic data and tag it (dashboards always show something).
    #[default]
    AlwaysShow,
    /// Surface `MisconfiguredCredential` instead of faking data.
    RealDataOnly,
}

/// State of a provider's credential, as reported by the status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Configured,
    /// Key is blank or still equal to the placeholder sentinel.
    Placeholder,
    /// Provider needs no authentication.
    NotRequired,
}

/// Per-provider connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: String,
    /// `None` for providers that need no authentication.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub page_limit: usize,
}

impl ProviderConfig {
    fn new(endpoint: &str, api_key: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.map(str::to_string),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Classify the configured key against the provider's placeholder.
    pub fn credential_status(&self, placeholder: &str) -> CredentialStatus {
        match self.api_key.as_deref().map(str::trim) {
            None => CredentialStatus::NotRequired,
            Some(key) if key.is_empty() || key == placeholder => CredentialStatus::Placeholder,
            Some(_) => CredentialStatus::Configured,
        }
    }
}

/// Full configuration for an [`AcquisitionService`](crate::data::AcquisitionService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    pub bls: ProviderConfig,
    pub fred: ProviderConfig,
    pub spending: ProviderConfig,
    pub policy: FallbackPolicy,
    /// Mixed into the synthesizer seed; change it to get a different synthetic draw.
    pub synth_seed: u64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            bls: ProviderConfig::new(BLS_ENDPOINT, Some(BLS_KEY_PLACEHOLDER)),
            fred: ProviderConfig::new(FRED_ENDPOINT, Some(FRED_KEY_PLACEHOLDER)),
            spending: ProviderConfig::new(USASPENDING_ENDPOINT, None),
            policy: FallbackPolicy::AlwaysShow,
            synth_seed: 42,
        }
    }
}

impl AcquisitionConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, AcquisitionError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, starting from defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AcquisitionError> {
        let mut config = Self::default();

        if let Some(key) = lookup("BLS_API_KEY") {
            config.bls.api_key = Some(key);
        }
        if let Some(key) = lookup("FRED_API_KEY") {
            config.fred.api_key = Some(key);
        }
        if let Some(url) = lookup("BLS_ENDPOINT") {
            config.bls.endpoint = url;
        }
        if let Some(url) = lookup("FRED_ENDPOINT") {
            config.fred.endpoint = url;
        }
        if let Some(url) = lookup("USASPENDING_ENDPOINT") {
            config.spending.endpoint = url;
        }

        if let Some(raw) = lookup("LABORSTAT_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("LABORSTAT_TIMEOUT_SECS", &raw))?;
            if secs == 0 {
                return Err(invalid("LABORSTAT_TIMEOUT_SECS", &raw));
            }
            for provider in [&mut config.bls, &mut config.fred, &mut config.spending] {
                provider.timeout_secs = secs;
            }
        }

        if let Some(raw) = lookup("LABORSTAT_PAGE_LIMIT") {
            let limit: usize = raw
                .trim()
                .parse()
                .map_err(|_| invalid("LABORSTAT_PAGE_LIMIT", &raw))?;
            config.spending.page_limit = limit.clamp(1, MAX_PAGE_LIMIT);
        }

        if let Some(raw) = lookup("LABORSTAT_POLICY") {
            config.policy = FallbackPolicy::from_str(raw.trim(), true)
                .map_err(|_| invalid("LABORSTAT_POLICY", &raw))?;
        }

        if let Some(raw) = lookup("LABORSTAT_SEED") {
            config.synth_seed = raw
                .trim()
                .parse()
                .map_err(|_| invalid("LABORSTAT_SEED", &raw))?;
        }

        Ok(config)
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Bls => &self.bls,
            ProviderKind::Fred => &self.fred,
            ProviderKind::UsaSpending => &self.spending,
        }
    }

    /// Credential status for every provider, in `ProviderKind::ALL` order.
    pub fn credential_report(&self) -> Vec<(ProviderKind, CredentialStatus)> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| {
                let placeholder = match kind {
                    ProviderKind::Bls => BLS_KEY_PLACEHOLDER,
                    ProviderKind::Fred => FRED_KEY_PLACEHOLDER,
                    ProviderKind::UsaSpending => "",
                };
                (kind, self.provider(kind).credential_status(placeholder))
            })
            .collect()
    }
}

fn invalid(var: &str, raw: &str) -> AcquisitionError {
    AcquisitionError::InvalidConfig(format!("{var} '{raw}'"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_placeholders_and_thirty_second_timeouts() {
        let config = AcquisitionConfig::default();
        assert_eq!(config.fred.timeout_secs, 30);
        assert_eq!(config.spending.page_limit, 100);
        assert_eq!(config.policy, FallbackPolicy::AlwaysShow);
        assert_eq!(
            config.credential_report(),
            vec![
                (ProviderKind::Bls, CredentialStatus::Placeholder),
                (ProviderKind::Fred, CredentialStatus::Placeholder),
                (ProviderKind::UsaSpending, CredentialStatus::NotRequired),
            ]
        );
    }

    #[test]
    fn reads_keys_and_overrides_from_lookup() {
        let config = AcquisitionConfig::from_lookup(lookup_from(&[
            ("FRED_API_KEY", "abc123"),
            ("LABORSTAT_TIMEOUT_SECS", "5"),
            ("LABORSTAT_PAGE_LIMIT", "500"),
            ("LABORSTAT_POLICY", "real-data-only"),
        ]))
        .unwrap();

        assert_eq!(config.fred.credential_status(FRED_KEY_PLACEHOLDER), CredentialStatus::Configured);
        assert_eq!(config.bls.timeout_secs, 5);
        assert_eq!(config.spending.timeout_secs, 5);
        assert_eq!(config.spending.page_limit, MAX_PAGE_LIMIT);
        assert_eq!(config.policy, FallbackPolicy::RealDataOnly);
    }

    #[test]
    fn blank_key_counts_as_placeholder() {
        let config = AcquisitionConfig::from_lookup(lookup_from(&[("FRED_API_KEY", "  ")])).unwrap();
        assert_eq!(config.fred.credential_status(FRED_KEY_PLACEHOLDER), CredentialStatus::Placeholder);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AcquisitionConfig::from_lookup(lookup_from(&[("LABORSTAT_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            AcquisitionError::InvalidConfig(ref msg) if msg.contains("LABORSTAT_TIMEOUT_SECS")
        ));
        assert_eq!(err.exit_code(), 2);

        let zero = AcquisitionConfig::from_lookup(lookup_from(&[("LABORSTAT_TIMEOUT_SECS", "0")]));
        assert!(matches!(zero, Err(AcquisitionError::InvalidConfig(_))));
        let policy = AcquisitionConfig::from_lookup(lookup_from(&[("LABORSTAT_POLICY", "maybe")]));
        assert!(matches!(policy, Err(AcquisitionError::InvalidConfig(_))));
    }
}
