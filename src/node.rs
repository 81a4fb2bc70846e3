use crate::alphabet::Probe;
use crate::reference::NodeId;
use crate::utils::{mix64, pairing3, MyHash};

/// A state of the automaton.
///
/// Transitions are kept sorted by label, so iterating them yields children in
/// ascending symbol order. Canonical nodes are never modified in place; the
/// `with_*` methods produce modified copies that are then canonicalized.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Node {
    accept: bool,
    edges: Vec<(u32, NodeId)>,
}

impl Node {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            edges: Vec::new(),
        }
    }

    /// Create a node with a single transition.
    pub fn with_single_edge(accept: bool, label: u32, child: NodeId) -> Self {
        Self {
            accept,
            edges: vec![(label, child)],
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accept
    }

    /// Transitions in ascending label order.
    pub fn edges(&self) -> &[(u32, NodeId)] {
        &self.edges
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.edges.iter().map(|&(_, child)| child)
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// A non-accepting node without transitions recognizes nothing.
    /// Only the root of an empty automaton is allowed to be dead.
    pub fn is_dead(&self) -> bool {
        !self.accept && self.edges.is_empty()
    }

    fn position(&self, label: u32) -> Result<usize, usize> {
        self.edges.binary_search_by_key(&label, |&(l, _)| l)
    }

    pub fn child(&self, label: u32) -> Option<NodeId> {
        self.position(label).ok().map(|i| self.edges[i].1)
    }

    pub fn first_edge(&self) -> Option<(u32, NodeId)> {
        self.edges.first().copied()
    }

    pub fn last_edge(&self) -> Option<(u32, NodeId)> {
        self.edges.last().copied()
    }

    /// Largest transition with label `< label`.
    pub fn edge_below(&self, label: u32) -> Option<(u32, NodeId)> {
        let i = self.edges.partition_point(|&(l, _)| l < label);
        i.checked_sub(1).map(|i| self.edges[i])
    }

    /// Smallest transition with label `> label`.
    pub fn edge_above(&self, label: u32) -> Option<(u32, NodeId)> {
        let i = self.edges.partition_point(|&(l, _)| l <= label);
        self.edges.get(i).copied()
    }

    /// Smallest transition with label `>= label`.
    pub fn edge_from(&self, label: u32) -> Option<(u32, NodeId)> {
        let i = self.edges.partition_point(|&(l, _)| l < label);
        self.edges.get(i).copied()
    }

    /// Child reached by the probed symbol.
    pub fn child_probe(&self, probe: Probe) -> Option<NodeId> {
        match probe {
            Probe::Hit(label) => self.child(label),
            Probe::Miss(_) => None,
        }
    }

    /// Nearest transition strictly before the probed symbol.
    pub fn edge_before(&self, probe: Probe) -> Option<(u32, NodeId)> {
        match probe {
            Probe::Hit(label) | Probe::Miss(label) => self.edge_below(label),
        }
    }

    /// Nearest transition strictly after the probed symbol.
    pub fn edge_after(&self, probe: Probe) -> Option<(u32, NodeId)> {
        match probe {
            Probe::Hit(label) => self.edge_above(label),
            Probe::Miss(label) => self.edge_from(label),
        }
    }

    pub fn with_accepting(&self, accept: bool) -> Self {
        Self {
            accept,
            edges: self.edges.clone(),
        }
    }

    /// Copy of this node where `label` leads to `child`, adding the transition if needed.
    pub fn with_child(&self, label: u32, child: NodeId) -> Self {
        let mut edges = self.edges.clone();
        match self.position(label) {
            Ok(i) => edges[i].1 = child,
            Err(i) => edges.insert(i, (label, child)),
        }
        Self {
            accept: self.accept,
            edges,
        }
    }

    /// Copy of this node without the `label` transition.
    ///
    /// # Panics
    ///
    /// Panics if there is no such transition.
    pub fn without_child(&self, label: u32) -> Self {
        let i = self
            .position(label)
            .unwrap_or_else(|_| panic!("without_child: label {} not found", label));
        let mut edges = self.edges.clone();
        edges.remove(i);
        Self {
            accept: self.accept,
            edges,
        }
    }

    /// Rewrite labels through a strictly monotone mapping.
    pub(crate) fn relabel(&mut self, f: impl Fn(u32) -> u32) {
        for (label, _) in self.edges.iter_mut() {
            *label = f(*label);
        }
        debug_assert!(self.edges.windows(2).all(|w| w[0].0 < w[1].0), "relabel must preserve order");
    }
}

impl MyHash for Node {
    /// Structural signature: accept flag plus the sorted `(label, child)` pairs.
    ///
    /// Children are canonical, so two nodes with equal signatures (and equal contents)
    /// have equal right-languages.
    fn hash(&self) -> u64 {
        let seed = self.accept as u64 + 1;
        let h = self
            .edges
            .iter()
            .fold(seed, |h, &(label, child)| pairing3(h, label as u64, child.get() as u64));
        mix64(h)
    }
}
