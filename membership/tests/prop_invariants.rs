//! Property-based checks of crawl and reconciliation over random fleets.

use fleet_membership::{Crawler, MembershipError, Reconciler, Registry};
use fleet_nullables::{monitor_dump, NullFleet, NullNode};
use fleet_rpc::MonitorDumpParser;
use fleet_types::{Coinbase, DirectoryEntry, Enode, Timestamp};
use proptest::prelude::*;
use std::collections::HashSet;

/// One generated node: validator row?, behaviour, peer indices, self-recognized?
type Shape = (bool, u8, Vec<usize>, bool);

fn id(i: usize) -> String {
    format!("e{i:02x}")
}

fn coinbase(i: usize) -> String {
    format!("0x{i:03}")
}

fn build(shapes: &[Shape]) -> (NullFleet, Vec<DirectoryEntry>) {
    let n = shapes.len();
    let fleet = NullFleet::new();
    let mut entries = Vec::new();
    for (i, (is_validator, behaviour, peers, recognized)) in shapes.iter().enumerate() {
        let enode = Enode::new(id(i));
        entries.push(if *is_validator {
            DirectoryEntry::validator(format!("E{i}"), enode, "10.0.0.1", 21000)
        } else {
            DirectoryEntry::regular(format!("E{i}"), "key=", enode, "10.0.0.1", 21000)
        });

        let mut peer_ids: Vec<String> = peers.iter().map(|p| id(p % n)).collect();
        // Every third node also sees a peer outside the directory.
        if i % 3 == 2 {
            peer_ids.push("ffff".into());
        }
        let peer_refs: Vec<&str> = peer_ids.iter().map(String::as_str).collect();
        let own = coinbase(i);
        let mut set = vec![coinbase(0)];
        if *recognized {
            set.push(own.clone());
        }
        let set_refs: Vec<&str> = set.iter().map(String::as_str).collect();
        let dump = monitor_dump(&id(i), &peer_refs, Some(&own), &set_refs);

        let node = match behaviour {
            0 => NullNode::down(),
            1 => NullNode::unreachable(),
            2 => NullNode::up(dump).without_node_info(),
            _ => NullNode::up(dump),
        };
        fleet.set(&id(i), node);
    }
    (fleet, entries)
}

fn fleets() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(
        (
            any::<bool>(),
            0u8..6,
            prop::collection::vec(0usize..16, 0..5),
            any::<bool>(),
        ),
        1..10,
    )
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #[test]
    fn crawl_visits_each_node_at_most_once(shapes in fleets()) {
        let (fleet, entries) = build(&shapes);
        let mut registry = Registry::from_entries(entries);
        let parser = MonitorDumpParser::new();
        let result = block_on(Crawler::new(&fleet, &parser).crawl(&mut registry, Timestamp::new(1)));

        for i in 0..shapes.len() {
            prop_assert!(fleet.node_info_fetches(&id(i)) <= 1);
        }
        prop_assert_eq!(fleet.node_info_fetches("ffff"), 0);

        match result {
            Ok(report) => {
                prop_assert_eq!(registry.frontier_len(), 0);
                prop_assert_eq!(report.visited, registry.visited_count());
                for node in registry.nodes() {
                    let state = report.state_of(node.id());
                    prop_assert_eq!(registry.is_visited(node.id()), state.is_terminal());
                    prop_assert!(node.last_update.is_some());
                    if !registry.is_visited(node.id()) {
                        prop_assert!(node.has_incidents());
                    }
                }
            }
            Err(MembershipError::NoReachableValidator) => {
                prop_assert_eq!(registry.visited_count(), 0);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn validators_are_volunteers_and_each_votes_once(shapes in fleets()) {
        let (fleet, entries) = build(&shapes);
        let mut registry = Registry::from_entries(entries);
        let parser = MonitorDumpParser::new();
        if block_on(Crawler::new(&fleet, &parser).crawl(&mut registry, Timestamp::new(1))).is_err() {
            return Ok(());
        }

        let reconciler = Reconciler::new(&registry, &fleet);
        let volunteers: HashSet<&Enode> = reconciler.list_volunteers().into_iter().map(|n| n.id()).collect();
        let validators: Vec<&Enode> = reconciler.list_validators().into_iter().map(|n| n.id()).collect();
        for v in &validators {
            prop_assert!(volunteers.contains(v));
        }

        fleet.reset_calls();
        let candidate = Coinbase::from("0xcafe");
        let round = block_on(reconciler.propose(&candidate));
        let proposed: Vec<Enode> = fleet.proposals().into_iter().map(|(node, _, _)| node).collect();
        prop_assert_eq!(round.votes.len(), validators.len());
        prop_assert_eq!(proposed.len(), validators.len());
        let unique: HashSet<&Enode> = proposed.iter().collect();
        prop_assert_eq!(unique.len(), proposed.len());
        // No validator view contains the candidate, so every vote adds it.
        prop_assert!(fleet.proposals().iter().all(|(_, c, value)| *c == candidate && *value));
    }
}
