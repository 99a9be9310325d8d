//! Crawl engine: breadth-first walk of the live peer topology.
//!
//! Process:
//! 1. Scan the directory in order for the first validator-eligible node whose
//!    monitor answers the status check; that node seeds the frontier.
//! 2. Visit frontier nodes one at a time: check liveness, fetch and parse the
//!    monitor dump, merge it into the node, and push every directory-known,
//!    unvisited peer onto the frontier. Peers outside the directory are
//!    reported on the visiting node and never traversed.
//! 3. Once the frontier drains, every node left unvisited is reported offline.
//!
//! Each id is visited at most once per run: the registry marks an id visited
//! in the same step that takes it off the frontier, and only unvisited ids are
//! admitted back.

use fleet_rpc::{NodeApi, SnapshotAdapter};
use fleet_types::{Enode, Incident, Node, NodeSnapshot, Timestamp};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::Instrument;

use crate::spans::{crawl_span, visit_span};
use crate::{MembershipError, Registry};

/// Where a node stands within one crawl run.
///
/// A run moves each reached id through `Frontier` and `Visiting` to a terminal
/// state. The frontier drains before a run ends, so a finished
/// [`CrawlReport`] only holds `Undiscovered` and terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    /// Not yet reached from the entry validator.
    Undiscovered,
    /// Waiting on the frontier.
    Frontier,
    /// Currently being inspected.
    Visiting,
    /// Inspected: monitor answered and its dump was merged.
    Healthy,
    /// Visited, but the monitor or its dump was unavailable.
    Unreachable,
}

impl NodeState {
    /// Final states a visited node can end a run in.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Healthy | Self::Unreachable)
    }
}

/// Outcome of a crawl run.
#[derive(Clone, Debug, Serialize)]
pub struct CrawlReport {
    /// Validator the traversal started from.
    pub entry: Enode,
    /// Time stamped on every node this run.
    pub finished_at: Timestamp,
    pub total: usize,
    pub visited: usize,
    /// Final state of every directory node.
    pub states: BTreeMap<Enode, NodeState>,
    /// Every node carrying at least one incident, in directory order.
    pub problems: Vec<Node>,
}

impl CrawlReport {
    pub fn state_of(&self, id: &Enode) -> NodeState {
        self.states.get(id).copied().unwrap_or(NodeState::Undiscovered)
    }

    pub fn count(&self, state: NodeState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Walks the peer graph of one registry using a node API and a snapshot adapter.
pub struct Crawler<'a, A, S> {
    api: &'a A,
    snapshots: &'a S,
}

impl<'a, A: NodeApi, S: SnapshotAdapter> Crawler<'a, A, S> {
    pub fn new(api: &'a A, snapshots: &'a S) -> Self {
        Self { api, snapshots }
    }

    /// First validator-eligible node, in directory order, whose monitor is up.
    pub async fn find_entry_point(&self, registry: &Registry) -> Result<Enode, MembershipError> {
        for node in registry.nodes().filter(|n| n.is_validator_eligible()) {
            if self.is_alive(node).await {
                tracing::info!(entity = %node.entity, enode = %node.id().short(), "entry validator found");
                return Ok(node.id().clone());
            }
        }
        Err(MembershipError::NoReachableValidator)
    }

    /// Run the full crawl over a freshly seeded registry.
    ///
    /// Recoverable problems become incidents on the affected nodes; only the
    /// absence of any reachable validator aborts the run.
    pub async fn crawl(
        &self,
        registry: &mut Registry,
        now: Timestamp,
    ) -> Result<CrawlReport, MembershipError> {
        if registry.visited_count() > 0 {
            return Err(MembershipError::AlreadyCrawled);
        }
        let span = crawl_span(registry.len());
        self.run(registry, now).instrument(span).await
    }

    async fn run(
        &self,
        registry: &mut Registry,
        now: Timestamp,
    ) -> Result<CrawlReport, MembershipError> {
        let entry = self.find_entry_point(registry).await?;

        let mut states: BTreeMap<Enode, NodeState> = registry
            .nodes()
            .map(|n| (n.id().clone(), NodeState::Undiscovered))
            .collect();
        if registry.enqueue(&entry) {
            transition(&mut states, &entry, NodeState::Frontier);
        }

        while let Some(id) = registry.take_next() {
            transition(&mut states, &id, NodeState::Visiting);
            let (state, admitted) = self.visit(registry, &id, now).await;
            for peer in &admitted {
                transition(&mut states, peer, NodeState::Frontier);
            }
            transition(&mut states, &id, state);
        }

        for id in registry.unvisited_ids() {
            if let Some(node) = registry.get_mut(&id) {
                tracing::debug!(entity = %node.entity, enode = %id.short(), "node appears offline");
                node.record(Incident::AppearsOffline);
                node.last_update = Some(now);
            }
        }

        let problems: Vec<Node> = registry
            .nodes()
            .filter(|n| n.has_incidents())
            .cloned()
            .collect();

        let report = CrawlReport {
            entry,
            finished_at: now,
            total: registry.len(),
            visited: registry.visited_count(),
            states,
            problems,
        };
        tracing::info!(
            total = report.total,
            visited = report.visited,
            healthy = report.count(NodeState::Healthy),
            unreachable = report.count(NodeState::Unreachable),
            with_incidents = report.problems.len(),
            "crawl finished"
        );
        Ok(report)
    }

    /// Inspect one node that has just been taken off the frontier. Returns its
    /// final state and the peers it put on the frontier.
    async fn visit(
        &self,
        registry: &mut Registry,
        id: &Enode,
        now: Timestamp,
    ) -> (NodeState, Vec<Enode>) {
        let Some(mut node) = registry.get(id).cloned() else {
            return (NodeState::Undiscovered, Vec::new());
        };
        let span = visit_span(id, &node.entity);
        let mut admitted = Vec::new();
        let state = async {
            node.last_update = Some(now);

            if !self.is_alive(&node).await {
                tracing::debug!("monitor not available");
                node.record(Incident::MonitorUnavailable);
                return NodeState::Unreachable;
            }

            let raw = match self.api.node_info(&node).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!(error = %e, "node info not available");
                    node.record(Incident::SnapshotUnavailable {
                        reason: e.to_string(),
                    });
                    return NodeState::Unreachable;
                }
            };

            let parsed = self.snapshots.parse(&raw);
            node.monitor_raw = Some(raw);
            let snapshot = match parsed {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::debug!(error = %e, "node info unreadable");
                    node.record(Incident::SnapshotUnreadable {
                        reason: e.to_string(),
                    });
                    return NodeState::Unreachable;
                }
            };

            merge_snapshot(&mut node, &snapshot);
            admitted = follow_peers(registry, &mut node, &snapshot);
            NodeState::Healthy
        }
        .instrument(span)
        .await;

        registry.put(node);
        (state, admitted)
    }

    /// Transport failures count as "not alive" for this one check.
    async fn is_alive(&self, node: &Node) -> bool {
        match self.api.status(node).await {
            Ok(alive) => alive,
            Err(e) => {
                tracing::trace!(enode = %node.id().short(), error = %e, "status check failed");
                false
            }
        }
    }
}

/// Fold what a node reports about itself into its registry entry.
///
/// Coinbase and validator set are captured once per run: a validator-eligible
/// node whose coinbase is already resolved keeps its first view, and regular
/// nodes are never given one.
fn merge_snapshot(node: &mut Node, snapshot: &NodeSnapshot) {
    if snapshot.reported_id != *node.id() {
        tracing::debug!(reported = %snapshot.reported_id.short(), "enode mismatch");
        node.record(Incident::EnodeMismatch {
            reported: snapshot.reported_id.clone(),
        });
    }

    node.peers = snapshot.peers.clone();

    if node.is_validator_eligible() && node.resolved_coinbase().is_none() {
        node.coinbase = snapshot.coinbase.clone();
        node.validator_set = snapshot
            .reported_validator_set
            .clone()
            .unwrap_or_default()
            .into();
    }
}

fn transition(states: &mut BTreeMap<Enode, NodeState>, id: &Enode, state: NodeState) {
    tracing::trace!(enode = %id.short(), ?state, "node state");
    states.insert(id.clone(), state);
}

/// Grow the frontier from the node's peers; only directory-known ids are
/// followed. Returns the ids admitted to the frontier.
fn follow_peers(registry: &mut Registry, node: &mut Node, snapshot: &NodeSnapshot) -> Vec<Enode> {
    let mut admitted = Vec::new();
    for peer in &snapshot.peers {
        if registry.contains(&peer.id) {
            if registry.enqueue(&peer.id) {
                admitted.push(peer.id.clone());
            }
        } else {
            tracing::debug!(peer = %peer.id.short(), name = %peer.name, "unknown enode");
            node.record(Incident::UnknownEnode {
                peer: peer.id.clone(),
            });
        }
    }
    admitted
}
