//! Nullable infrastructure for deterministic testing.
//!
//! The crawl and reconciliation engines only reach the outside world through
//! the [`fleet_rpc::NodeApi`] and [`fleet_directory::DirectoryAdapter`] traits.
//! This crate provides in-memory implementations that:
//! - Answer from a scripted per-node behaviour
//! - Record every call for assertions
//! - Never touch the network
//!
//! Usage: swap the real client for a [`NullFleet`] in tests.

pub mod directory;
pub mod dump;
pub mod fleet;

pub use directory::NullDirectory;
pub use dump::monitor_dump;
pub use fleet::{Call, NullFleet, NullNode, ProposeReply};
