use fleet_types::Enode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MembershipError {
    /// No validator-eligible directory node answered the liveness check.
    #[error("no reachable validator: no directory validator answered the status check")]
    NoReachableValidator,

    #[error("registry has already been crawled; seed a new one for each run")]
    AlreadyCrawled,

    #[error("node {0} is not in the directory")]
    UnknownNode(Enode),

    #[error("rpc error: {0}")]
    Rpc(#[from] fleet_rpc::RpcError),
}
