use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory document {url} could not be fetched: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP client could not be built: {0}")]
    Client(String),

    #[error("directory document {0} lists no nodes")]
    Empty(String),
}
