use thiserror::Error;

/// Any failure of an API call: transport, non-success status, or body decode.
#[derive(Debug, Error)]
#[error("request to {endpoint} failed: {source}")]
pub struct FetchError {
    pub endpoint: String,
    pub source: anyhow::Error,
}

impl FetchError {
    pub fn new(endpoint: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}
