//! Errors raised while building fleet values from untrusted text.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid enode identifier: {0}")]
    InvalidEnode(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),
}
