//! Validator reconciliation: who can validate, who does, and proposal rounds.
//!
//! Works on a registry after its crawl has finished. It only borrows the
//! registry immutably, so it cannot overlap a crawl of the same registry.

use fleet_rpc::api::{UPDATE_PATH, VERSION_UPDATE_PATH};
use fleet_rpc::NodeApi;
use fleet_types::{Coinbase, Enode, Node};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::Instrument;

use crate::spans::{broadcast_span, propose_span};
use crate::{MembershipError, Registry};

/// How one validator answered a propose call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// The node answered `"ok"`.
    Accepted,
    /// The node answered, but not with `"ok"`.
    Rejected,
    /// Transport failure; the call never got an answer.
    Failed(String),
}

/// One propose call sent during a round.
#[derive(Clone, Debug, Serialize)]
pub struct Vote {
    pub validator: Enode,
    pub entity: String,
    pub coinbase: Coinbase,
    /// `true` asks to add the candidate, `false` to remove it.
    pub value: bool,
    pub outcome: VoteOutcome,
}

/// Result of asking every recognized validator to vote on one candidate.
#[derive(Clone, Debug, Serialize)]
pub struct ProposalRound {
    pub candidate: Coinbase,
    pub votes: Vec<Vote>,
}

impl ProposalRound {
    /// A round succeeds when any single validator accepted its vote. Set
    /// changes can complete over several independent rounds, so one accepted
    /// vote is progress.
    pub fn succeeded(&self) -> bool {
        self.votes.iter().any(|v| v.outcome == VoteOutcome::Accepted)
    }

    pub fn accepted(&self) -> usize {
        self.votes
            .iter()
            .filter(|v| v.outcome == VoteOutcome::Accepted)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &Vote> {
        self.votes
            .iter()
            .filter(|v| matches!(v.outcome, VoteOutcome::Failed(_)))
    }
}

/// Reads a crawled registry and talks to validators.
pub struct Reconciler<'a, A> {
    registry: &'a Registry,
    api: &'a A,
}

impl<'a, A: NodeApi> Reconciler<'a, A> {
    pub fn new(registry: &'a Registry, api: &'a A) -> Self {
        Self { registry, api }
    }

    /// Visited nodes that published a coinbase, whether or not the network
    /// currently recognizes them.
    pub fn list_volunteers(&self) -> Vec<&'a Node> {
        self.registry
            .visited_nodes()
            .filter(|n| n.resolved_coinbase().is_some())
            .collect()
    }

    /// Visited nodes whose own validator set contains their coinbase.
    pub fn list_validators(&self) -> Vec<&'a Node> {
        let validators: Vec<&'a Node> = self
            .registry
            .visited_nodes()
            .filter(|n| n.recognizes_itself())
            .collect();
        for v in &validators {
            tracing::debug!(
                entity = %v.entity,
                coinbase = %v.coinbase.as_ref().map(Coinbase::as_str).unwrap_or_default(),
                set_size = v.validator_set.len(),
                "validator"
            );
        }
        validators
    }

    /// Ask every recognized validator, except the candidate itself, to vote
    /// the candidate in (if its view lacks it) or out (if its view has it).
    ///
    /// Calls are independent: a failure is recorded on its vote and the round
    /// carries on. There is no retry.
    pub async fn propose(&self, candidate: &Coinbase) -> ProposalRound {
        let span = propose_span(candidate);
        async {
            let mut votes = Vec::new();
            for validator in self.list_validators() {
                let Some(own) = validator.resolved_coinbase() else {
                    continue;
                };
                if own == candidate {
                    tracing::debug!(entity = %validator.entity, "skipping candidate's own node");
                    continue;
                }
                let value = !validator.validator_set.contains(candidate);
                let outcome = match self.api.propose(validator, candidate, value).await {
                    Ok(true) => VoteOutcome::Accepted,
                    Ok(false) => VoteOutcome::Rejected,
                    Err(e) => {
                        tracing::warn!(entity = %validator.entity, error = %e, "propose failed");
                        VoteOutcome::Failed(e.to_string())
                    }
                };
                votes.push(Vote {
                    validator: validator.id().clone(),
                    entity: validator.entity.clone(),
                    coinbase: own.clone(),
                    value,
                    outcome,
                });
            }
            let round = ProposalRound {
                candidate: candidate.clone(),
                votes,
            };
            tracing::info!(
                calls = round.votes.len(),
                accepted = round.accepted(),
                succeeded = round.succeeded(),
                "proposal round finished"
            );
            round
        }
        .instrument(span)
        .await
    }

    /// Ask one directory node for its coinbase.
    pub async fn coinbase_of(&self, id: &Enode) -> Result<Coinbase, MembershipError> {
        let node = self
            .registry
            .get(id)
            .ok_or_else(|| MembershipError::UnknownNode(id.clone()))?;
        Ok(self.api.coinbase(node).await?)
    }

    /// GET `path` on every visited node, one at a time in directory order.
    ///
    /// Stops at the first failed call and returns its error; nodes after it
    /// are not contacted. Otherwise returns how many nodes answered.
    pub async fn broadcast(&self, path: &str) -> Result<usize, MembershipError> {
        let nodes: Vec<&Node> = self.registry.visited_nodes().collect();
        let span = broadcast_span(path, nodes.len());
        async {
            for node in &nodes {
                if let Err(e) = self.api.call(node, path).await {
                    tracing::warn!(entity = %node.entity, error = %e, "broadcast stopped");
                    return Err(MembershipError::Rpc(e));
                }
            }
            Ok(nodes.len())
        }
        .instrument(span)
        .await
    }

    /// Tell every visited node to refresh its software. Results are ignored;
    /// returns how many nodes were contacted.
    pub async fn broadcast_update(&self) -> usize {
        let nodes: Vec<&Node> = self.registry.visited_nodes().collect();
        let span = broadcast_span(UPDATE_PATH, nodes.len());
        async {
            let calls = nodes.iter().map(|n| async move {
                if let Err(e) = self.api.update(n).await {
                    tracing::debug!(entity = %n.entity, error = %e, "update not delivered");
                }
            });
            join_all(calls).await;
        }
        .instrument(span)
        .await;
        nodes.len()
    }

    /// Tell every visited node's monitor agent to update itself. Results are
    /// ignored; returns how many nodes were contacted.
    pub async fn broadcast_version_update(&self) -> usize {
        let nodes: Vec<&Node> = self.registry.visited_nodes().collect();
        let span = broadcast_span(VERSION_UPDATE_PATH, nodes.len());
        async {
            let calls = nodes.iter().map(|n| async move {
                if let Err(e) = self.api.version_update(n).await {
                    tracing::debug!(entity = %n.entity, error = %e, "version update not delivered");
                }
            });
            join_all(calls).await;
        }
        .instrument(span)
        .await;
        nodes.len()
    }
}
