//! Error types for each layer of the scraper.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::types::FavoriteQuestionList;

/// Errors raised while resolving configuration and credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("no csrf token configured; set app.secrets.csrf_token or APP_SECRETS_CSRF_TOKEN")]
    MissingCredential,
    #[error("csrf token contains characters not allowed in a header")]
    InvalidCredential,
    #[error("could not read browser cookies: {0}")]
    Browser(String),
    #[error("failed to create HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from a single GraphQL call, transport and decoding both.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("received non-200 status code: {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to make request")]
    Request(#[source] reqwest::Error),
    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),
    #[error("failed to marshal request")]
    Encode(#[source] serde_json::Error),
    #[error("failed to unmarshal response")]
    Decode(#[from] serde_json::Error),
    #[error("no data in {operation} response: {message}")]
    MissingData {
        operation: &'static str,
        message: String,
    },
}

/// Errors that stop an accumulation. Both carry whatever was fetched
/// before the loop gave up.
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("page at skip={skip} failed after {attempts} attempts")]
    Page {
        skip: usize,
        attempts: u32,
        partial: Box<FavoriteQuestionList>,
        #[source]
        source: ApiError,
    },
    #[error("reported total {total} not reached after {fetched_pages} pages")]
    PageBudgetExhausted {
        total: usize,
        fetched_pages: usize,
        partial: Box<FavoriteQuestionList>,
    },
}

impl PaginateError {
    pub fn partial(&self) -> &FavoriteQuestionList {
        match self {
            PaginateError::Page { partial, .. } => partial,
            PaginateError::PageBudgetExhausted { partial, .. } => partial,
        }
    }
}

/// Local file errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{action} {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
