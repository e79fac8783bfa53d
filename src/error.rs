//! Error types.
//!
//! - [`AcquisitionError`]: what the library surfaces to callers. Only a few
//!   conditions are fatal; provider failures are absorbed by the fallback path.
//! - [`AppError`]: what the binary prints before exiting (message + exit code).

use thiserror::Error;

/// Errors surfaced by the acquisition service.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// No provider or synthesizer recognizes the metric.
    #[error("Unsupported metric: {0}")]
    UnsupportedMetric(String),

    /// A required API key is missing or still the placeholder value, and the
    /// deployment policy forbids substituting synthetic data.
    #[error("{provider} API key is not configured")]
    MisconfiguredCredential {
        /// The provider whose key is missing
        provider: String,
    },

    /// An environment setting could not be parsed or is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start_date` is after `end_date`.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    /// Neither the provider nor the synthesizer produced a single observation.
    #[error("No observations available for {metric} in {region}")]
    NoObservations { metric: String, region: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AcquisitionError {
    /// Exit code the CLI should use when this error reaches `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::UnsupportedMetric(_)
            | Self::MisconfiguredCredential { .. }
            | Self::InvalidConfig(_)
            | Self::InvalidDateRange { .. } => 2,
            Self::NoObservations { .. } | Self::HttpClient(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AcquisitionError> for AppError {
    fn from(err: AcquisitionError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
