//! Error handling for the touhoudb-cli application
//!
//! Errors are split by layer: `UpstreamError` describes a single HTTP exchange
//! that did not yield usable JSON, `FetchError` describes why a resolution or
//! traversal step failed, and `TdbError` is what commands bubble up to `main`.

use thiserror::Error;

use crate::core::models::EntityKind;

#[derive(Error, Debug)]
pub enum TdbError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No {kind} found for '{query}'")]
    NotFound { kind: EntityKind, query: String },

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Missing field '{field}' in {kind} payload")]
    MissingField { kind: EntityKind, field: &'static str },
}

impl FetchError {
    /// Status code observed on the failing exchange, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Upstream(err) => err.status_code(),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned non-JSON content ({content_type}) with status {status}")]
    UnexpectedContentType {
        url: String,
        status: u16,
        content_type: String,
    },

    #[error("{url} returned an unreadable body: {reason}")]
    InvalidBody {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. }
            | UpstreamError::UnexpectedContentType { status, .. }
            | UpstreamError::InvalidBody { status, .. } => Some(*status),
            UpstreamError::Timeout { .. } => None,
            UpstreamError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to determine project directories")]
    ProjectDirs,
}

pub type Result<T> = std::result::Result<T, TdbError>;

impl From<std::io::Error> for TdbError {
    fn from(err: std::io::Error) -> Self {
        TdbError::Config(ConfigError::Io(err))
    }
}

impl From<toml::de::Error> for TdbError {
    fn from(err: toml::de::Error) -> Self {
        TdbError::Config(ConfigError::InvalidFormat(err))
    }
}

impl From<UpstreamError> for TdbError {
    fn from(err: UpstreamError) -> Self {
        TdbError::Fetch(FetchError::Upstream(err))
    }
}
