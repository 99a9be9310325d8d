//! Fleet directory adapter.
//!
//! The directory is a pair of human-maintained markdown documents listing
//! every permitted node: one for validators, one for regular nodes. This
//! crate fetches them and extracts typed [`fleet_types::DirectoryEntry`]
//! rows, validators first.

pub mod error;
pub mod parser;
pub mod source;

pub use error::DirectoryError;
pub use parser::{parse_directory, DirectoryKind};
pub use source::{DirectoryAdapter, DirectoryUrls, MarkdownDirectory, DEFAULT_BASE_URL};
