//! The monitor RPC contract.

use fleet_types::{Coinbase, Node};
use serde::{Deserialize, Serialize};

use crate::RpcError;

/// Liveness check. Answers `{"status": "ok"}` when the node is healthy.
pub const STATUS_PATH: &str = "/v1/monitor/status";
/// Raw diagnostic dump consumed by a [`crate::SnapshotAdapter`].
pub const NODE_INFO_PATH: &str = "/v1/node/info/json";
pub const COINBASE_PATH: &str = "/v1/node/coinbase";
pub const PROPOSE_PATH: &str = "/v1/node/propose";
/// Asks the monitor agent to update itself.
pub const VERSION_UPDATE_PATH: &str = "/v1/monitor/update";
/// Asks the node to refresh its own software.
pub const UPDATE_PATH: &str = "/v1/node/update";

/// The answer the monitor treats as success.
pub const STATUS_OK: &str = "ok";

/// `{status}` body returned by the status and propose endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    #[serde(alias = "Status")]
    pub status: String,
}

impl StatusReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// `{data}` body returned by the coinbase endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseReply {
    #[serde(alias = "Data")]
    pub data: String,
}

/// Body of a propose call. The vote travels as the string `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeForm {
    pub candidate: String,
    pub value: String,
}

impl ProposeForm {
    pub fn new(candidate: &Coinbase, value: bool) -> Self {
        Self {
            candidate: candidate.as_str().to_string(),
            value: value.to_string(),
        }
    }

    /// The vote as a bool; anything other than `"true"` reads as a removal.
    pub fn vote(&self) -> bool {
        self.value == "true"
    }
}

/// Calls the fleet monitor engines make against a single node.
///
/// Any `Err` is a transport-level failure for that one call. Callers decide
/// how to record it; none of these are fatal to a crawl.
#[allow(async_fn_in_trait)]
pub trait NodeApi {
    /// `true` iff the monitor answers `status == "ok"`.
    async fn status(&self, node: &Node) -> Result<bool, RpcError>;

    /// Raw node-info dump.
    async fn node_info(&self, node: &Node) -> Result<String, RpcError>;

    async fn coinbase(&self, node: &Node) -> Result<Coinbase, RpcError>;

    /// Ask `node` to vote for adding (`true`) or removing (`false`) `candidate`.
    /// Returns whether the node answered `"ok"`.
    async fn propose(&self, node: &Node, candidate: &Coinbase, value: bool)
        -> Result<bool, RpcError>;

    async fn version_update(&self, node: &Node) -> Result<(), RpcError>;

    async fn update(&self, node: &Node) -> Result<(), RpcError>;

    /// GET an arbitrary monitor path and return the raw body.
    async fn call(&self, node: &Node, path: &str) -> Result<String, RpcError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reply_accepts_either_case() {
        let lower: StatusReply = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        let upper: StatusReply = serde_json::from_str(r#"{"Status":"ok"}"#).unwrap();
        assert!(lower.is_ok());
        assert!(upper.is_ok());
        let down: StatusReply = serde_json::from_str(r#"{"status":"down"}"#).unwrap();
        assert!(!down.is_ok());
    }

    #[test]
    fn propose_form_encodes_vote_as_string() {
        let form = ProposeForm::new(&Coinbase::from("0xABC"), true);
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({"candidate": "0xABC", "value": "true"}));
        assert!(form.vote());
        assert!(!ProposeForm::new(&Coinbase::from("0xABC"), false).vote());
    }
}
