//! Node registry: the per-run catalogue the crawl and reconciliation work on.
//!
//! Three views over the same node set:
//! - `all`: every directory node, keyed by enode, plus the directory order.
//! - `visited`: monotone; an id never goes back to unvisited within a run.
//! - `frontier`: ids pending a visit. Always a subset of `all` and disjoint
//!   from the visited ids.
//!
//! A registry serves exactly one run. Seed a fresh one for the next run.

use fleet_types::{DirectoryEntry, Enode, Node};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct Registry {
    all: HashMap<Enode, Node>,
    seed_order: Vec<Enode>,
    visited: HashMap<Enode, bool>,
    /// Iteration order is unspecified; callers must not depend on it.
    frontier: HashSet<Enode>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every entry, all unvisited.
    pub fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        let mut registry = Self::new();
        registry.seed(entries);
        registry
    }

    /// Add directory entries. A repeated enode overwrites the earlier node but
    /// keeps its original position in the directory order.
    pub fn seed(&mut self, entries: impl IntoIterator<Item = DirectoryEntry>) {
        for entry in entries {
            self.put(Node::from(entry));
        }
    }

    /// Insert or replace a node. New ids start unvisited; the visited flag of
    /// an existing id is left untouched.
    pub fn put(&mut self, node: Node) {
        let id = node.id().clone();
        if !self.all.contains_key(&id) {
            self.seed_order.push(id.clone());
        }
        self.visited.entry(id.clone()).or_insert(false);
        self.all.insert(id, node);
    }

    pub fn get(&self, id: &Enode) -> Option<&Node> {
        self.all.get(id)
    }

    pub fn get_mut(&mut self, id: &Enode) -> Option<&mut Node> {
        self.all.get_mut(id)
    }

    pub fn contains(&self, id: &Enode) -> bool {
        self.all.contains_key(id)
    }

    /// Mark a node visited and drop it from the frontier.
    /// Returns `true` if this call changed it from unvisited.
    pub fn mark_visited(&mut self, id: &Enode) -> bool {
        self.frontier.remove(id);
        match self.visited.get_mut(id) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_visited(&self, id: &Enode) -> bool {
        self.visited.get(id).copied().unwrap_or(false)
    }

    /// Put a known, unvisited id on the frontier.
    /// Returns `true` if the id was admitted (it may already have been there).
    pub fn enqueue(&mut self, id: &Enode) -> bool {
        if !self.contains(id) || self.is_visited(id) {
            return false;
        }
        self.frontier.insert(id.clone());
        true
    }

    /// Pop an arbitrary frontier id and mark it visited in the same step,
    /// so it can never be handed out twice.
    pub fn take_next(&mut self) -> Option<Enode> {
        let id = self.frontier.iter().next().cloned()?;
        self.mark_visited(&id);
        Some(id)
    }

    pub fn in_frontier(&self, id: &Enode) -> bool {
        self.frontier.contains(id)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.values().filter(|v| **v).count()
    }

    /// All nodes in directory order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.seed_order.iter().filter_map(|id| self.all.get(id))
    }

    /// Visited nodes in directory order.
    pub fn visited_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|n| self.is_visited(n.id()))
    }

    /// Ids never visited, in directory order.
    pub fn unvisited_ids(&self) -> Vec<Enode> {
        self.seed_order
            .iter()
            .filter(|id| !self.is_visited(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> DirectoryEntry {
        DirectoryEntry::validator(format!("entity-{id}"), Enode::new(id), "10.0.0.1", 21000)
    }

    #[test]
    fn seed_marks_everything_unvisited() {
        let reg = Registry::from_entries(vec![entry("aa"), entry("bb")]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.visited_count(), 0);
        assert_eq!(reg.frontier_len(), 0);
        assert!(!reg.is_visited(&Enode::new("aa")));
    }

    #[test]
    fn duplicate_seed_overwrites_but_keeps_order() {
        let mut dup = entry("aa");
        dup.entity = "Replacement".into();
        let reg = Registry::from_entries(vec![entry("aa"), entry("bb"), dup]);
        assert_eq!(reg.len(), 2);
        let ids: Vec<&str> = reg.nodes().map(|n| n.id().as_str()).collect();
        assert_eq!(ids, vec!["aa", "bb"]);
        assert_eq!(reg.get(&Enode::new("aa")).unwrap().entity, "Replacement");
    }

    #[test]
    fn enqueue_only_admits_known_unvisited_ids() {
        let mut reg = Registry::from_entries(vec![entry("aa"), entry("bb")]);
        assert!(reg.enqueue(&Enode::new("aa")));
        assert!(!reg.enqueue(&Enode::new("zz")));
        reg.mark_visited(&Enode::new("bb"));
        assert!(!reg.enqueue(&Enode::new("bb")));
        assert_eq!(reg.frontier_len(), 1);
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut reg = Registry::from_entries(vec![entry("aa")]);
        reg.enqueue(&Enode::new("aa"));
        reg.enqueue(&Enode::new("aa"));
        assert_eq!(reg.frontier_len(), 1);
    }

    #[test]
    fn take_next_marks_visited_and_removes_from_frontier() {
        let mut reg = Registry::from_entries(vec![entry("aa")]);
        reg.enqueue(&Enode::new("aa"));
        let id = reg.take_next().unwrap();
        assert_eq!(id.as_str(), "aa");
        assert!(reg.is_visited(&id));
        assert!(!reg.in_frontier(&id));
        assert!(reg.take_next().is_none());
        assert!(!reg.enqueue(&id));
    }

    #[test]
    fn visited_is_monotone() {
        let mut reg = Registry::from_entries(vec![entry("aa")]);
        let id = Enode::new("aa");
        assert!(reg.mark_visited(&id));
        assert!(!reg.mark_visited(&id));
        reg.put(reg.get(&id).unwrap().clone());
        assert!(reg.is_visited(&id));
    }

    #[test]
    fn mark_visited_ignores_unknown_ids() {
        let mut reg = Registry::new();
        assert!(!reg.mark_visited(&Enode::new("zz")));
        assert!(!reg.is_visited(&Enode::new("zz")));
    }

    #[test]
    fn unvisited_ids_follow_directory_order() {
        let mut reg = Registry::from_entries(vec![entry("aa"), entry("bb"), entry("cc")]);
        reg.mark_visited(&Enode::new("bb"));
        let ids: Vec<String> = reg.unvisited_ids().iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["aa", "cc"]);
        assert_eq!(reg.visited_nodes().count(), 1);
    }
}
