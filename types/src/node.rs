//! The per-run node model.

use serde::{Deserialize, Serialize};

use crate::{Coinbase, DirectoryEntry, Enode, Incident, Timestamp, ValidatorSet};

/// A peer connection as observed in another node's monitor dump.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSummary {
    pub id: Enode,
    pub name: String,
    pub remote_address: String,
}

/// One network participant, as known during a single crawl run.
///
/// Built from a [`DirectoryEntry`] at the start of the run and discarded
/// afterwards. The identifier is fixed at construction; everything else is
/// filled in by the crawl.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: Enode,
    pub entity: String,
    pub contacts: Vec<String>,
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<Coinbase>,
    /// Raw monitor dump from the last visit. Not reported.
    #[serde(skip)]
    pub monitor_raw: Option<String>,
    #[serde(default)]
    pub peers: Vec<PeerSummary>,
    #[serde(default)]
    pub validator_set: ValidatorSet,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub last_update: Option<Timestamp>,
}

impl Node {
    pub fn id(&self) -> &Enode {
        &self.id
    }

    /// Regular nodes (those with a `privateFor` key) never act as validators.
    pub fn is_validator_eligible(&self) -> bool {
        self.private_for.as_deref().map_or(true, |p| p.trim().is_empty())
    }

    /// Coinbase, if one has been resolved and is non-empty.
    pub fn resolved_coinbase(&self) -> Option<&Coinbase> {
        self.coinbase.as_ref().filter(|c| !c.is_empty())
    }

    /// Whether this node's own view lists its coinbase as a validator.
    pub fn recognizes_itself(&self) -> bool {
        self.resolved_coinbase()
            .is_some_and(|c| self.validator_set.contains(c))
    }

    pub fn record(&mut self, incident: Incident) {
        self.incidents.push(incident);
    }

    pub fn has_incidents(&self) -> bool {
        !self.incidents.is_empty()
    }
}

impl From<DirectoryEntry> for Node {
    fn from(entry: DirectoryEntry) -> Self {
        Self {
            id: entry.enode,
            entity: entry.entity,
            contacts: entry.contacts,
            address: entry.ip,
            port: entry.port,
            private_for: entry.private_for,
            coinbase: None,
            monitor_raw: None,
            peers: Vec::new(),
            validator_set: ValidatorSet::new(),
            incidents: Vec::new(),
            last_update: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Node {
        Node::from(DirectoryEntry::validator("Acme", Enode::new("aa"), "10.0.0.1", 21000))
    }

    #[test]
    fn built_from_directory_entry() {
        let node = validator();
        assert_eq!(node.id().as_str(), "aa");
        assert_eq!(node.address, "10.0.0.1");
        assert!(node.is_validator_eligible());
        assert!(node.resolved_coinbase().is_none());
        assert!(node.last_update.is_none());
    }

    #[test]
    fn regular_nodes_are_not_eligible() {
        let node = Node::from(DirectoryEntry::regular(
            "Acme",
            "key=",
            Enode::new("bb"),
            "10.0.0.2",
            21000,
        ));
        assert!(!node.is_validator_eligible());
    }

    #[test]
    fn blank_private_for_counts_as_validator() {
        let mut node = validator();
        node.private_for = Some("  ".into());
        assert!(node.is_validator_eligible());
    }

    #[test]
    fn recognizes_itself_only_when_listed() {
        let mut node = validator();
        node.coinbase = Some(Coinbase::from("0x222"));
        node.validator_set = vec![Coinbase::from("0x111")].into();
        assert!(!node.recognizes_itself());
        node.validator_set = vec![Coinbase::from("0x222"), Coinbase::from("0x111")].into();
        assert!(node.recognizes_itself());
    }

    #[test]
    fn empty_coinbase_is_unresolved() {
        let mut node = validator();
        node.coinbase = Some(Coinbase::from(""));
        assert!(node.resolved_coinbase().is_none());
        assert!(!node.recognizes_itself());
    }

    #[test]
    fn monitor_dump_is_not_serialized() {
        let mut node = validator();
        node.monitor_raw = Some("raw".into());
        node.record(Incident::MonitorUnavailable);
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("monitor_raw").is_none());
        assert_eq!(json["incidents"][0]["kind"], "monitor_unavailable");
    }
}
