//! Crawl-and-reconcile engine for the validator fleet.
//!
//! One monitoring run goes through three stages:
//! 1. [`Registry`] is seeded from the directory: every permitted node, unvisited.
//! 2. [`Crawler`] walks the live peer graph breadth-first from the first
//!    reachable validator, merging each node's monitor snapshot and recording
//!    incidents. Nodes never reached are reported as offline.
//! 3. [`Reconciler`] reads the crawled registry to list volunteers and
//!    recognized validators, and drives propose/vote rounds on the validator set.
//!
//! ## Module overview
//!
//! - [`registry`]: per-run node catalogue with visited set and frontier.
//! - [`crawler`]: BFS over the peer graph and the incident report.
//! - [`reconciler`]: validator membership views and proposal rounds.
//! - [`spans`]: tracing span constructors shared by the engines.
//! - [`error`]: fatal run errors.

pub mod crawler;
pub mod error;
pub mod reconciler;
pub mod registry;
pub mod spans;

pub use crawler::{CrawlReport, Crawler, NodeState};
pub use error::MembershipError;
pub use reconciler::{ProposalRound, Reconciler, Vote, VoteOutcome};
pub use registry::Registry;
