use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
