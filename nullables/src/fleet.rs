//! Nullable fleet: scripted monitor agents that record every call.

use fleet_rpc::{NodeApi, RpcError};
use fleet_types::{Coinbase, Enode, Node};
use std::cell::RefCell;
use std::collections::HashMap;

/// How a scripted node answers propose calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProposeReply {
    Ok,
    Rejected,
    Unreachable,
}

/// Scripted behaviour of one node's monitor agent.
#[derive(Clone, Debug)]
pub struct NullNode {
    /// Transport works at all. When `false`, every call fails.
    pub reachable: bool,
    /// Status check answers `"ok"`.
    pub alive: bool,
    /// Node-info dump; `None` makes the fetch fail.
    pub dump: Option<String>,
    pub coinbase: Option<Coinbase>,
    pub propose_reply: ProposeReply,
}

impl NullNode {
    /// A healthy node serving `dump`.
    pub fn up(dump: impl Into<String>) -> Self {
        Self {
            reachable: true,
            alive: true,
            dump: Some(dump.into()),
            coinbase: None,
            propose_reply: ProposeReply::Ok,
        }
    }

    /// Monitor answers, but not with `"ok"`.
    pub fn down() -> Self {
        Self {
            alive: false,
            dump: None,
            ..Self::up("")
        }
    }

    /// No answer to anything.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::down()
        }
    }

    /// Alive, but the node-info fetch fails.
    pub fn without_node_info(mut self) -> Self {
        self.dump = None;
        self
    }

    pub fn with_coinbase(mut self, coinbase: &str) -> Self {
        self.coinbase = Some(Coinbase::from(coinbase));
        self
    }

    pub fn replying(mut self, reply: ProposeReply) -> Self {
        self.propose_reply = reply;
        self
    }
}

/// A call received by the nullable fleet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Status(Enode),
    NodeInfo(Enode),
    Coinbase(Enode),
    Propose {
        node: Enode,
        candidate: Coinbase,
        value: bool,
    },
    VersionUpdate(Enode),
    Update(Enode),
    Get { node: Enode, path: String },
}

/// A [`NodeApi`] answering from scripted [`NullNode`]s keyed by enode.
///
/// Nodes that were never scripted behave as unreachable.
#[derive(Default)]
pub struct NullFleet {
    nodes: RefCell<HashMap<Enode, NullNode>>,
    calls: RefCell<Vec<Call>>,
}

impl NullFleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`NullFleet::set`].
    pub fn with(self, id: &str, node: NullNode) -> Self {
        self.set(id, node);
        self
    }

    /// Script (or re-script) a node's behaviour.
    pub fn set(&self, id: &str, node: NullNode) {
        self.nodes.borrow_mut().insert(Enode::new(id), node);
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Propose calls received, in order.
    pub fn proposals(&self) -> Vec<(Enode, Coinbase, bool)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Propose {
                    node,
                    candidate,
                    value,
                } => Some((node.clone(), candidate.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    /// How many times a node's dump was fetched.
    pub fn node_info_fetches(&self, id: &str) -> usize {
        let id = Enode::new(id);
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::NodeInfo(n) if *n == id))
            .count()
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn script(&self, node: &Node) -> Result<NullNode, RpcError> {
        match self.nodes.borrow().get(node.id()) {
            Some(script) if script.reachable => Ok(script.clone()),
            _ => Err(RpcError::Unreachable(format!(
                "connection failed: {}",
                node.address
            ))),
        }
    }
}

impl NodeApi for NullFleet {
    async fn status(&self, node: &Node) -> Result<bool, RpcError> {
        self.record(Call::Status(node.id().clone()));
        Ok(self.script(node)?.alive)
    }

    async fn node_info(&self, node: &Node) -> Result<String, RpcError> {
        self.record(Call::NodeInfo(node.id().clone()));
        self.script(node)?
            .dump
            .ok_or_else(|| RpcError::RequestFailed("HTTP status 500".into()))
    }

    async fn coinbase(&self, node: &Node) -> Result<Coinbase, RpcError> {
        self.record(Call::Coinbase(node.id().clone()));
        self.script(node)?
            .coinbase
            .ok_or_else(|| RpcError::InvalidResponse("missing data".into()))
    }

    async fn propose(
        &self,
        node: &Node,
        candidate: &Coinbase,
        value: bool,
    ) -> Result<bool, RpcError> {
        self.record(Call::Propose {
            node: node.id().clone(),
            candidate: candidate.clone(),
            value,
        });
        match self.script(node)?.propose_reply {
            ProposeReply::Ok => Ok(true),
            ProposeReply::Rejected => Ok(false),
            ProposeReply::Unreachable => Err(RpcError::Unreachable("request timed out".into())),
        }
    }

    async fn version_update(&self, node: &Node) -> Result<(), RpcError> {
        self.record(Call::VersionUpdate(node.id().clone()));
        self.script(node).map(|_| ())
    }

    async fn update(&self, node: &Node) -> Result<(), RpcError> {
        self.record(Call::Update(node.id().clone()));
        self.script(node).map(|_| ())
    }

    async fn call(&self, node: &Node, path: &str) -> Result<String, RpcError> {
        self.record(Call::Get {
            node: node.id().clone(),
            path: path.to_string(),
        });
        self.script(node).map(|_| String::new())
    }
}
