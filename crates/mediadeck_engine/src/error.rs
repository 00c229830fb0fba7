use mediadeck_core::JobId;

use crate::{DecodeError, TransportError};

/// Failure of a session operation, returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("malformed response: {0}")]
    Decode(#[from] DecodeError),
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("backend rejected the command ({status}): {message}")]
    ActionRejected { status: u16, message: String },
    #[error("job {0} is not in the current queue")]
    UnknownJob(JobId),
    #[error("session has been shut down")]
    ShutDown,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}
