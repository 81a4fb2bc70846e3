//! Insertion with eager minimization.
//!
//! Canonical nodes are immutable. Inserting a string rebuilds the nodes on its path
//! bottom-up: first the nodes for the unmatched suffix, then a copy of every node on
//! the matched prefix with the updated transition. Each rebuilt node is passed
//! through [`canonicalize`], which returns the registered node with the same
//! structure if there is one, so the graph stays minimal whatever the insertion
//! order is.

use log::debug;

use crate::dawg::{Dawg, DawgConfig, Storage};
use crate::error::Result;
use crate::node::Node;
use crate::reference::NodeId;

/// Return the canonical node structurally equal to `node`, registering it if needed.
///
/// A newly registered node holds a reference to each of its children.
pub(crate) fn canonicalize(storage: &mut Storage, node: Node) -> NodeId {
    debug_assert!(
        node.children().all(|child| storage.is_occupied(child.index())),
        "Cannot canonicalize unless all children are canonical"
    );

    if let Some(index) = storage.find(&node) {
        debug!("canonicalize: found @{}", index);
        return NodeId::from(index);
    }

    let children: Vec<NodeId> = node.children().collect();
    let index = storage.insert(node);
    for child in children {
        storage.retain(child.index());
    }
    debug!("canonicalize: new @{}", index);
    NodeId::from(index)
}

impl Dawg {
    /// Build an automaton holding the given strings, with the default configuration.
    pub fn from_strings<S: AsRef<str>>(strings: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::with_strings(DawgConfig::default(), strings)
    }

    /// Build an automaton holding the given strings.
    ///
    /// The strings may come in any order and may contain duplicates.
    pub fn with_strings<S: AsRef<str>>(config: DawgConfig, strings: impl IntoIterator<Item = S>) -> Result<Self> {
        let dawg = Dawg::new(config);
        for s in strings {
            dawg.insert(s.as_ref())?;
        }
        Ok(dawg)
    }

    /// Add a string to the set.
    ///
    /// Returns `Ok(true)` if the string was added and `Ok(false)` if it was already
    /// present. Fails without modifying anything if the string contains the reserved
    /// symbol, or a symbol outside of an optimized alphabet.
    ///
    /// ```
    /// use dawg_rs::dawg::Dawg;
    ///
    /// let dawg = Dawg::default();
    /// assert_eq!(dawg.insert("testing"), Ok(true));
    /// assert_eq!(dawg.insert("resting"), Ok(true));
    /// assert_eq!(dawg.insert("testing"), Ok(false));
    /// assert_eq!(dawg.len(), 2);
    /// // The common suffix is stored once.
    /// assert_eq!(dawg.node_at("te"), dawg.node_at("re"));
    /// ```
    pub fn insert(&self, s: &str) -> Result<bool> {
        debug!("insert({:?})", s);

        let word = self.encode_for_insert(s)?;
        let mut storage = self.storage_mut();

        // Follow the existing transitions. `path[i]` is the node after `word[..i]`.
        let mut path = Vec::with_capacity(word.len() + 1);
        let mut current = self.root();
        path.push(current);
        for &label in word.iter() {
            match storage.node(current).child(label) {
                Some(next) => {
                    current = next;
                    path.push(current);
                }
                None => break,
            }
        }
        let matched = path.len() - 1;

        if matched == word.len() && storage.node(current).is_accepting() {
            debug!("insert: {:?} is already present", s);
            return Ok(false);
        }

        // The lowest changed node: either the existing terminal, now accepting,
        // or the chain spelling the unmatched suffix.
        let mut updated = if matched == word.len() {
            let terminal = storage.node(current).with_accepting(true);
            canonicalize(&mut storage, terminal)
        } else {
            debug!("insert: diverges at depth {}", matched);
            let mut child = canonicalize(&mut storage, Node::new(true));
            for &label in word[matched + 1..].iter().rev() {
                child = canonicalize(&mut storage, Node::with_single_edge(false, label, child));
            }
            child
        };

        // Copy the matched path up to the root, redirecting one transition per level.
        let top = if matched < word.len() { matched + 1 } else { matched };
        for depth in (0..top).rev() {
            let parent = storage.node(path[depth]).with_child(word[depth], updated);
            updated = canonicalize(&mut storage, parent);
        }

        self.replace_root(&mut storage, updated);
        drop(storage);

        self.set_len(self.len() + 1);
        self.bump_generation();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::DawgError;

    #[test]
    fn test_insert_single() {
        let dawg = Dawg::default();
        assert_eq!(dawg.insert("abc"), Ok(true));
        assert_eq!(dawg.len(), 1);
        assert!(dawg.contains("abc"));
        assert!(!dawg.contains("ab"));
        assert!(!dawg.contains("abcd"));
        // Root plus one node per symbol.
        assert_eq!(dawg.node_count(), 4);
    }

    #[test]
    fn test_insert_duplicate() {
        let dawg = Dawg::default();
        assert_eq!(dawg.insert("abc"), Ok(true));
        let generation = dawg.generation();
        let nodes = dawg.node_count();
        assert_eq!(dawg.insert("abc"), Ok(false));
        assert_eq!(dawg.len(), 1);
        assert_eq!(dawg.node_count(), nodes);
        assert_eq!(dawg.generation(), generation);
    }

    #[test]
    fn test_insert_prefix_of_existing() {
        let dawg = Dawg::from_strings(["cart"]).unwrap();
        assert_eq!(dawg.insert("car"), Ok(true));
        assert!(dawg.contains("car"));
        assert!(dawg.contains("cart"));
        assert!(!dawg.contains("ca"));
        assert_eq!(dawg.len(), 2);
    }

    #[test]
    fn test_insert_extension_of_existing() {
        let dawg = Dawg::from_strings(["car"]).unwrap();
        assert_eq!(dawg.insert("cart"), Ok(true));
        assert!(dawg.contains("car"));
        assert!(dawg.contains("cart"));
    }

    #[test]
    fn test_insert_empty_string() {
        let dawg = Dawg::default();
        assert_eq!(dawg.insert(""), Ok(true));
        assert!(dawg.contains(""));
        assert!(dawg.is_accepting(dawg.root()));
        assert_eq!(dawg.insert(""), Ok(false));
        assert_eq!(dawg.len(), 1);
        assert_eq!(dawg.node_count(), 1);
    }

    #[test]
    fn test_suffix_sharing() {
        let dawg = Dawg::from_strings(["testing", "resting"]).unwrap();
        let te = dawg.node_at("te").unwrap();
        let re = dawg.node_at("re").unwrap();
        assert_eq!(te, re);
        assert_eq!(dawg.signature(te), dawg.signature(re));
        assert_eq!(dawg.node_at("testi"), dawg.node_at("resti"));
        // The shared node has two parents.
        assert_eq!(dawg.refs(dawg.node_at("t").unwrap()), 2);
        // The root plus one node per remaining suffix of "esting", down to the final state.
        assert_eq!(dawg.node_count(), 8);
    }

    #[test]
    fn test_order_independence() {
        let words = ["tap", "taps", "top", "tops", "tip", "tips", "stop", "stops"];
        let forward = Dawg::from_strings(words).unwrap();
        let backward = Dawg::from_strings(words.iter().rev()).unwrap();
        assert_eq!(forward.node_count(), backward.node_count());
        assert_eq!(forward.transition_count(), backward.transition_count());
        assert!(forward.is_minimal());
        assert!(backward.is_minimal());
    }

    #[test]
    fn test_new_word_merges_into_existing_suffix() {
        let dawg = Dawg::from_strings(["bake", "cake"]).unwrap();
        let nodes = dawg.node_count();
        dawg.insert("fake").unwrap();
        // Only the root changes; "f" reuses the "ake" subtree.
        assert_eq!(dawg.node_count(), nodes);
        assert_eq!(dawg.node_at("f"), dawg.node_at("b"));
    }

    #[test]
    fn test_unique_table_grows() {
        let words: Vec<String> = (0..500).map(|i| format!("{}x{}", i, i * 7)).collect();
        let dawg = Dawg::with_strings(DawgConfig::default().with_bucket_bits(2), &words).unwrap();
        let storage = dawg.storage();
        assert!(storage.bucket_count() > 4);
        assert!(storage.bucket_count() >= storage.real_size());
        drop(storage);
        for word in words.iter() {
            assert!(dawg.contains(word));
        }
        assert!(dawg.verify_refcounts().is_empty());
    }

    #[test]
    fn test_insert_rejects_reserved() {
        let dawg = Dawg::from_strings(["a"]).unwrap();
        assert!(matches!(dawg.insert("a\0"), Err(DawgError::InvalidArgument(_))));
        assert_eq!(dawg.len(), 1);
    }

    #[test]
    fn test_with_strings_propagates_errors() {
        let result = Dawg::from_strings(["ok", "bad\0"]);
        assert!(matches!(result, Err(DawgError::InvalidArgument(_))));
    }
}
