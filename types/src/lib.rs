//! Fundamental types for the fleet monitor.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! node identifiers, validator addresses, the per-run node model, incidents,
//! and the typed records produced by the directory and snapshot adapters.

pub mod coinbase;
pub mod directory;
pub mod enode;
pub mod error;
pub mod incident;
pub mod node;
pub mod snapshot;
pub mod time;

pub use coinbase::{Coinbase, ValidatorSet};
pub use directory::DirectoryEntry;
pub use enode::Enode;
pub use error::TypesError;
pub use incident::Incident;
pub use node::{Node, PeerSummary};
pub use snapshot::NodeSnapshot;
pub use time::Timestamp;
