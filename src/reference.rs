use std::fmt::{Display, Formatter};

/// Handle of a node inside the automaton's node table.
///
/// Handles are plain indices: copying one never touches the node it names.
/// Index 0 is the table sentry and never refers to a real node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the internal representation of the handle.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the index of the node in the table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Node index {} does not fit into u32", index);
        Self(index as u32)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodeId::new(42).to_string(), "@42");
    }

    #[test]
    fn test_from_index() {
        let id = NodeId::from(7usize);
        assert_eq!(id.get(), 7);
        assert_eq!(id.index(), 7);
    }
}
