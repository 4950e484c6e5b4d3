//! Error handling for the application

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, fatal before anything else runs
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Price text could not be turned into a number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no numeric value in price text {0:?}")]
    NoNumber(String),
}

/// Page fetch and extraction errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid CSS selector {0:?}")]
    InvalidSelector(String),

    #[error("selector {0:?} matched no elements")]
    NoMatch(String),

    #[error(transparent)]
    Price(#[from] ParseError),
}

/// History persistence errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to serialize price history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write price history to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Notification errors, logged but never fatal for the run
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("telegram request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("telegram API returned status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}
