//! Node monitor RPC for the fleet monitor.
//!
//! Every node runs a monitor agent on a fixed HTTPS port. This crate provides:
//! - [`NodeApi`]: the call contract the crawl and reconciliation engines depend on.
//! - [`MonitorClient`]: the reqwest implementation with client-certificate auth.
//! - [`SnapshotAdapter`] / [`MonitorDumpParser`]: turning the raw node-info dump
//!   into a typed [`fleet_types::NodeSnapshot`].

pub mod api;
pub mod client;
pub mod error;
pub mod snapshot;

pub use api::{NodeApi, ProposeForm, StatusReply, CoinbaseReply};
pub use client::{ClientConfig, MonitorClient, DEFAULT_MONITOR_PORT};
pub use error::{RpcError, SnapshotError};
pub use snapshot::{MonitorDumpParser, SnapshotAdapter};
