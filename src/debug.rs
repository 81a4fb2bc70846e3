//! Debug utilities for inspecting DAWG structure.
//!
//! These are primarily useful in tests and during development.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write;

use log::debug;

use crate::dawg::Dawg;
use crate::reference::NodeId;

/// Detailed information about a single state.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub accepting: bool,
    /// Number of parents, plus one for the root.
    pub refs: u32,
    pub edges: Vec<(char, NodeId)>,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if self.accepting {
            write!(f, "*")?;
        }
        write!(f, "(refs={})", self.refs)?;
        for (i, (symbol, child)) in self.edges.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{:?}->{}", sep, symbol, child)?;
        }
        Ok(())
    }
}

/// All states reachable from the root, for debugging.
#[derive(Debug, Clone)]
pub struct DawgTree {
    pub root: NodeId,
    pub nodes: Vec<NodeInfo>,
}

impl std::fmt::Display for DawgTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DAWG (root = {}):", self.root)?;
        for node in &self.nodes {
            writeln!(f, "  {}", node)?;
        }
        Ok(())
    }
}

impl Dawg {
    /// Get detailed information about a single state.
    pub fn node_info(&self, id: NodeId) -> NodeInfo {
        NodeInfo {
            id,
            accepting: self.is_accepting(id),
            refs: self.refs(id),
            edges: self.children(id),
        }
    }

    /// States reachable from the root.
    pub fn reachable(&self) -> BTreeSet<NodeId> {
        let storage = self.storage();
        let mut visited = BTreeSet::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                stack.extend(storage.node(id).children());
            }
        }
        visited
    }

    /// Get all reachable states in depth-first order from the root.
    pub fn debug_tree(&self) -> DawgTree {
        let mut nodes = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let info = self.node_info(id);
            // Reversed, so that the smallest symbol is visited first.
            stack.extend(info.edges.iter().rev().map(|&(_, child)| child));
            nodes.push(info);
        }

        DawgTree { root: self.root(), nodes }
    }

    /// Print a compact representation of the graph.
    pub fn debug_string(&self) -> String {
        let mut result = String::new();
        let tree = self.debug_tree();

        writeln!(&mut result, "DAWG {} (size={}):", tree.root, tree.nodes.len()).unwrap();
        for node in &tree.nodes {
            writeln!(&mut result, "  {}", node).unwrap();
        }
        result
    }

    /// Check that no two reachable states recognize the same language.
    ///
    /// Right languages are numbered bottom-up: the class of a state is determined by
    /// its accepting flag and the classes of its children, not by node identity. The
    /// automaton is minimal iff every reachable state gets a class of its own and no
    /// state other than the root is dead.
    pub fn is_minimal(&self) -> bool {
        let storage = self.storage();
        let root = self.root();
        let mut class_of: HashMap<NodeId, usize> = HashMap::new();
        let mut classes: HashMap<(bool, Vec<(u32, usize)>), NodeId> = HashMap::new();

        // Post-order: a state is classified once all of its children are.
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if class_of.contains_key(&id) {
                continue;
            }
            let node = storage.node(id);
            if !expanded {
                stack.push((id, true));
                stack.extend(
                    node.children()
                        .filter(|child| !class_of.contains_key(child))
                        .map(|child| (child, false)),
                );
                continue;
            }
            if node.is_dead() && id != root {
                return false;
            }
            let signature = node
                .edges()
                .iter()
                .map(|&(label, child)| (label, class_of[&child]))
                .collect();
            let class = classes.len();
            if let Some(other) = classes.insert((node.is_accepting(), signature), id) {
                debug!("is_minimal: {} and {} are equivalent", other, id);
                return false;
            }
            class_of.insert(id, class);
        }
        true
    }

    /// Compare every stored reference count with the number of actual parents.
    ///
    /// Returns `(node, stored, expected)` for each mismatch, plus every live state
    /// that is not reachable from the root (with `expected = 0`).
    pub fn verify_refcounts(&self) -> Vec<(NodeId, u32, u32)> {
        let storage = self.storage();
        let mut expected: HashMap<NodeId, u32> = HashMap::new();
        for index in storage.indices() {
            for child in storage[index].children() {
                *expected.entry(child).or_default() += 1;
            }
        }
        *expected.entry(self.root()).or_default() += 1;

        let reachable = self.reachable();
        let mut failures = Vec::new();
        for index in storage.indices() {
            let id = NodeId::from(index);
            let stored = storage.refs(index);
            let want = if reachable.contains(&id) {
                expected.get(&id).copied().unwrap_or(0)
            } else {
                0
            };
            if stored != want || !reachable.contains(&id) {
                failures.push((id, stored, want));
            }
        }
        failures
    }

    /// Dump complete state for debugging.
    pub fn dump_state(&self) -> String {
        let mut result = String::new();
        let storage = self.storage();

        writeln!(&mut result, "=== DAWG State ===").unwrap();
        writeln!(
            &mut result,
            "Strings: {}, generation: {}",
            self.len(),
            self.generation()
        )
        .unwrap();
        writeln!(
            &mut result,
            "Nodes: count={}, capacity={}, max chain={}",
            storage.real_size(),
            storage.capacity(),
            storage.max_chain()
        )
        .unwrap();
        match self.alphabet_size() {
            Some(n) => writeln!(&mut result, "Alphabet: optimized, {} symbols", n).unwrap(),
            None => writeln!(&mut result, "Alphabet: identity").unwrap(),
        }
        drop(storage);
        write!(&mut result, "{}", self.debug_tree()).unwrap();

        result
    }
}
