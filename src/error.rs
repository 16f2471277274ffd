use thiserror::Error;

/// Why a Markdown source could not be retrieved.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("could not read response body: {0}")]
    Body(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard API unavailable")]
    Unavailable,
    #[error("copy command was rejected")]
    CommandRejected,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
    #[error("could not prepare copy target: {0}")]
    Dom(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config object: {0}")]
    Js(String),
}
