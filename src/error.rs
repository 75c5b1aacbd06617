//! Custom error types for the dashboard
//!
//! Separates the three failure classes a view pipeline can hit: transport
//! failures, backend domain errors (`ok: false`) and client-side validation.

use thiserror::Error;

/// Errors raised at the fetcher boundary
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {endpoint} carried no data")]
    MissingData { endpoint: String },

    #[error("Backend rejected {endpoint}: {}", .message.as_deref().unwrap_or("no details"))]
    Domain {
        endpoint: String,
        message: Option<String>,
    },
}

impl FetchError {
    /// Network failures and undecodable payloads, as opposed to `ok: false`
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Domain { .. })
    }

    /// Backend-supplied message of a domain error, if any
    pub fn domain_message(&self) -> Option<&str> {
        match self {
            FetchError::Domain { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text shown to the user: the backend message for domain errors,
    /// `fallback` for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        self.domain_message().unwrap_or(fallback).to_string()
    }

    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Decode { endpoint, .. }
            | FetchError::MissingData { endpoint }
            | FetchError::Domain { endpoint, .. } => endpoint,
        }
    }
}

/// Client-side form validation errors; raised before any request is issued
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter a ticker")]
    EmptyTicker,

    #[error("Ticker {symbol:?} may only contain A-Z and 0-9")]
    InvalidTicker { symbol: String },

    #[error("Enter at least one ticker")]
    NoTickers,
}

/// Top-level dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<String> for DashboardError {
    fn from(err: String) -> Self {
        DashboardError::Config(err)
    }
}

impl From<&str> for DashboardError {
    fn from(err: &str) -> Self {
        DashboardError::Config(err.to_string())
    }
}
