//! Plain-text rendering of crawl results for operators.

use fleet_membership::{CrawlReport, NodeState, ProposalRound, VoteOutcome};
use fleet_types::{Coinbase, Incident, Node};
use fleet_utils::format_duration;
use std::fmt::Write;
use std::time::Duration;

/// Incident report: a summary line, then one block per node with incidents.
pub fn render_check(report: &CrawlReport, took: Duration) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "visited {} of {} nodes from {} in {} ({} healthy, {} unreachable)",
        report.visited,
        report.total,
        report.entry.short(),
        format_duration(took),
        report.count(NodeState::Healthy),
        report.count(NodeState::Unreachable),
    );
    if report.is_clean() {
        let _ = writeln!(out, "no incidents");
        return out;
    }
    for node in &report.problems {
        // Tag nodes whose own state is unknown, as opposed to nodes that
        // answered but reported something wrong.
        let tag = if node.incidents.iter().any(Incident::is_unreachable) {
            " [not inspected]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "\n{} ({}) {}:{}{tag}",
            node.entity,
            node.id().short(),
            node.address,
            node.port
        );
        if !node.contacts.is_empty() {
            let _ = writeln!(out, "  contacts: {}", node.contacts.join(", "));
        }
        for incident in &node.incidents {
            let _ = writeln!(out, "  - {incident}");
        }
    }
    out
}

/// One line per node: entity, short enode, coinbase and validator view size.
pub fn render_nodes(nodes: &[&Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        let _ = writeln!(
            out,
            "{:<32} {:<16} {:<44} sees {} validators",
            node.entity,
            node.id().short(),
            node.coinbase.as_ref().map(Coinbase::as_str).unwrap_or("-"),
            node.validator_set.len()
        );
    }
    let _ = writeln!(out, "{} nodes", nodes.len());
    out
}

pub fn render_round(round: &ProposalRound) -> String {
    let mut out = String::new();
    for vote in &round.votes {
        let verb = if vote.value { "add" } else { "remove" };
        let outcome = match &vote.outcome {
            VoteOutcome::Accepted => "accepted".to_string(),
            VoteOutcome::Rejected => "rejected".to_string(),
            VoteOutcome::Failed(reason) => format!("failed: {reason}"),
        };
        let _ = writeln!(
            out,
            "{:<32} {verb} {} -> {outcome}",
            vote.entity, round.candidate
        );
    }
    let _ = writeln!(
        out,
        "{} of {} votes accepted",
        round.accepted(),
        round.votes.len()
    );
    out
}
