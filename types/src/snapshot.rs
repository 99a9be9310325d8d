//! Typed view of a node's monitor dump.

use serde::{Deserialize, Serialize};

use crate::{Coinbase, Enode, PeerSummary};

/// What a node reports about itself through its monitor endpoint.
///
/// Every field other than `reported_id` is optional in the source dump;
/// absent sections come through as `None` or an empty peer list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub reported_id: Enode,
    #[serde(default)]
    pub reported_name: Option<String>,
    #[serde(default)]
    pub peers: Vec<PeerSummary>,
    #[serde(default)]
    pub coinbase: Option<Coinbase>,
    #[serde(default)]
    pub reported_validator_set: Option<Vec<Coinbase>>,
}
