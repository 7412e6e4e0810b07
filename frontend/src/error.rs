use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("dom operation failed: {0}")]
    Operation(String),
    /// Only ever logged; binders tolerate partial markup.
    #[error("no element matches `{0}`")]
    MissingElement(String),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed JSON body: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error! status: {status}")]
    RequestFailed { status: u16 },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid landing configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
