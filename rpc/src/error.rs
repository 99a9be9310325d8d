//! RPC and snapshot error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            RpcError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            RpcError::InvalidResponse(e.to_string())
        } else {
            RpcError::RequestFailed(e.to_string())
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("monitor dump is not a JSON object: {0}")]
    Malformed(String),

    #[error("monitor dump has no node identity")]
    MissingIdentity,
}
