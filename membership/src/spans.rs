//! Pre-built [`tracing::Span`] constructors for membership operations.

use fleet_types::{Coinbase, Enode};
use tracing::{info_span, Span};

/// Span covering one full crawl run.
pub fn crawl_span(nodes: usize) -> Span {
    info_span!("crawl", nodes)
}

/// Span covering the visit of a single node.
pub fn visit_span(enode: &Enode, entity: &str) -> Span {
    info_span!("crawl_visit", enode = %enode.short(), entity = %entity)
}

/// Span covering a proposal round for one candidate.
pub fn propose_span(candidate: &Coinbase) -> Span {
    info_span!("propose", candidate = %candidate)
}

/// Span covering a fire-and-forget call fanned out to visited nodes.
pub fn broadcast_span(path: &str, node_count: usize) -> Span {
    info_span!("broadcast", path = %path, node_count)
}
