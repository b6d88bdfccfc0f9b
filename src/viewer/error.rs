use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("customer identifier must not be empty")]
    EmptyIdentifier,

    #[error("invalid group key: {0}")]
    InvalidGroupKey(String),

    #[error("no group with date key {0}")]
    UnknownGroup(String),
}
