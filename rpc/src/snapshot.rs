//! Monitor dump interpretation.
//!
//! The node-info endpoint returns a JSON object whose values are, for the most
//! part, strings holding console-formatted output of the node's admin API.
//! Only the sections the crawl needs are extracted:
//! - `nodeInfo`: the node's own `id` and client `name` (required).
//! - `peers`: one block per connection with `id`, `name` and
//!   `network.remoteAddress`. Without that key the whole dump is searched.
//! - `coinbase`: a quoted address.
//! - `getValidators`: a bracketed list of quoted addresses.

use fleet_types::{Coinbase, Enode, NodeSnapshot, PeerSummary};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::SnapshotError;

static NODE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bid"?\s*:\s*"([0-9A-Fa-f]+)""#).expect("static regex"));

static NODE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bname"?\s*:\s*"([^"]*)""#).expect("static regex"));

static PEER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"\bid"?\s*:\s*"([0-9A-Fa-f]+)",\s*"#,
        r#""?name"?\s*:\s*"([^"]*)",\s*"#,
        r#""?network"?\s*:\s*\{\s*"#,
        r#""?localAddress"?\s*:\s*"[^"]*",\s*"#,
        r#""?remoteAddress"?\s*:\s*"([^"]+):\d+""#,
    ))
    .expect("static regex")
});

static QUOTED_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([0-9A-Za-z]+)""#).expect("static regex"));

/// Turns a node's raw monitor output into a typed snapshot.
pub trait SnapshotAdapter {
    fn parse(&self, raw: &str) -> Result<NodeSnapshot, SnapshotError>;
}

/// [`SnapshotAdapter`] for the monitor agent's `/v1/node/info/json` dump.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorDumpParser;

impl MonitorDumpParser {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotAdapter for MonitorDumpParser {
    fn parse(&self, raw: &str) -> Result<NodeSnapshot, SnapshotError> {
        let dump: Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| SnapshotError::Malformed(e.to_string()))?;

        let node_info = section(&dump, "nodeInfo").ok_or(SnapshotError::MissingIdentity)?;
        let reported_id = NODE_ID
            .captures(&node_info)
            .map(|c| Enode::new(&c[1]))
            .ok_or(SnapshotError::MissingIdentity)?;
        let reported_name = NODE_NAME.captures(&node_info).map(|c| c[1].to_string());

        // Agents that do not split out a `peers` section still embed the
        // peer blocks somewhere in the dump.
        let peer_text = section(&dump, "peers").unwrap_or_else(|| whole_dump(&dump));
        let peers = PEER
            .captures_iter(&peer_text)
            .map(|c| PeerSummary {
                id: Enode::new(&c[1]),
                name: c[2].to_string(),
                remote_address: c[3].to_string(),
            })
            .collect();

        let coinbase = section(&dump, "coinbase")
            .map(|text| Coinbase::new(text.trim().trim_matches('"')))
            .filter(|c| !c.is_empty());

        let reported_validator_set = section(&dump, "getValidators").map(|text| {
            QUOTED_ADDRESS
                .captures_iter(&text)
                .map(|c| Coinbase::new(&c[1]))
                .collect()
        });

        Ok(NodeSnapshot {
            reported_id,
            reported_name,
            peers,
            coinbase,
            reported_validator_set,
        })
    }
}

/// Text of a dump section: string values as-is, anything else as compact JSON.
fn section(dump: &Map<String, Value>, key: &str) -> Option<String> {
    match dump.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Every section's text, in dump order.
fn whole_dump(dump: &Map<String, Value>) -> String {
    dump.keys()
        .filter_map(|key| section(dump, key))
        .collect::<Vec<_>>()
        .join("\n")
}
