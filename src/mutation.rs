//! Removal and node reclamation.
//!
//! Removing a string copies its path bottom-up just like insertion does, except the
//! terminal loses its accepting flag and nodes that end up recognizing nothing are
//! pruned from their parents instead of being canonicalized. Every copied node goes
//! through the unique table, so the automaton is minimal again right after the call.
//!
//! Nodes are reference-counted by their parents (and the root by the automaton).
//! Replacing the root releases the old one; each node whose count drops to zero is
//! unlinked from the unique table and its children are released in turn.

use log::debug;

use crate::alphabet::Alphabet;
use crate::builder::canonicalize;
use crate::dawg::{Dawg, Storage};
use crate::node::Node;
use crate::reference::NodeId;

/// Release one reference to `id`, freeing every node that becomes unreachable.
pub(crate) fn release(storage: &mut Storage, id: NodeId) {
    let mut stack = vec![id];
    while let Some(id) = stack.pop() {
        let index = id.index();
        if storage.release(index) == 0 {
            stack.extend(storage.node(id).children());
            debug!("release: dropping {}", id);
            storage.remove(index);
        }
    }
}

impl Dawg {
    /// Install `root` as the new root and reclaim whatever only the old root used.
    pub(crate) fn replace_root(&self, storage: &mut Storage, root: NodeId) {
        let old = self.root();
        storage.retain(root.index());
        self.set_root(root);
        release(storage, old);
    }

    /// Remove a string from the set.
    ///
    /// Returns `true` if the string was present. Strings that could never have been
    /// stored (containing the reserved symbol or a symbol outside of an optimized
    /// alphabet) are simply reported as absent.
    ///
    /// ```
    /// use dawg_rs::dawg::Dawg;
    ///
    /// let dawg = Dawg::from_strings(["tap", "taps", "top"]).unwrap();
    /// assert!(dawg.remove("taps"));
    /// assert!(!dawg.remove("taps"));
    /// // "ta" and "to" are equivalent again and share a node.
    /// assert_eq!(dawg.node_at("ta"), dawg.node_at("to"));
    /// ```
    pub fn remove(&self, s: &str) -> bool {
        debug!("remove({:?})", s);

        if self.config().reserved.is_some_and(|reserved| s.contains(reserved)) {
            return false;
        }
        let word = match self.alphabet().encode_str(s) {
            Ok(word) => word,
            Err(_) => return false,
        };

        let mut storage = self.storage_mut();

        let mut path = Vec::with_capacity(word.len() + 1);
        let mut current = self.root();
        path.push(current);
        for &label in word.iter() {
            match storage.node(current).child(label) {
                Some(next) => {
                    current = next;
                    path.push(current);
                }
                None => return false,
            }
        }
        if !storage.node(current).is_accepting() {
            return false;
        }

        let terminal = storage.node(current).with_accepting(false);
        let mut updated = if terminal.is_dead() {
            None
        } else {
            Some(canonicalize(&mut storage, terminal))
        };

        for depth in (0..word.len()).rev() {
            let node = storage.node(path[depth]);
            let parent = match updated {
                Some(child) => node.with_child(word[depth], child),
                None => node.without_child(word[depth]),
            };
            updated = if parent.is_dead() {
                None
            } else {
                Some(canonicalize(&mut storage, parent))
            };
        }

        let root = match updated {
            Some(root) => root,
            None => canonicalize(&mut storage, Node::new(false)),
        };
        self.replace_root(&mut storage, root);
        drop(storage);

        self.set_len(self.len() - 1);
        self.bump_generation();
        true
    }

    /// Remove every string.
    ///
    /// This also drops an optimized alphabet.
    pub fn clear(&self) {
        debug!("clear()");
        self.storage_mut().clear();
        self.set_alphabet(Alphabet::Identity);
        self.set_len(0);
        self.reset_root();
        self.bump_generation();
    }
}
