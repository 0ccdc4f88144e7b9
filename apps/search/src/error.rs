//! Error types for the storefront search layer

use storefront_model::{HydrationError, ModelError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Elasticsearch transport error: {0}")]
    Elasticsearch(#[from] reqwest::Error),

    #[error("Elasticsearch responded with {status}: {message}")]
    ElasticsearchResponse { status: u16, message: String },

    #[error("Criteria error: {0}")]
    Model(ModelError),

    #[error("Hydration error: {0}")]
    Hydration(#[from] HydrationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Hydration(e) => Error::Hydration(e),
            other => Error::Model(other),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    /// Backend outage or transport failure.
    ///
    /// Callers map these to a generic "search unavailable" message instead
    /// of exposing backend details.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Elasticsearch(_) | Error::ElasticsearchResponse { .. }
        )
    }

    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Database(_) => "database",
            Error::Elasticsearch(_) | Error::ElasticsearchResponse { .. } => "elasticsearch",
            Error::Model(_) => "criteria",
            Error::Hydration(_) => "hydration",
            Error::InvalidInput(_) => "invalid_input",
            Error::Config(_) => "config",
            Error::Other(_) => "other",
        }
    }
}
