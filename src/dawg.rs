//! The automaton manager.
//!
//! [`Dawg`] owns the node table, the root handle, the alphabet mapping and the
//! generation counter. All operations take `&self`; mutation goes through interior
//! mutability. The type is therefore `!Sync`: concurrent use requires external
//! synchronization.
//!
//! The operations themselves live in sibling modules:
//!
//! - [`builder`](crate::builder): insertion with hash-consing,
//! - [`mutation`](crate::mutation): copy-on-write removal and node reclamation,
//! - [`navigate`](crate::navigate): first/last/lower/floor/ceiling/higher/poll,
//! - [`view`](crate::view) and [`iter`](crate::iter): bounded, prefix and descending views.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;

use log::debug;

use crate::alphabet::Alphabet;
use crate::builder::canonicalize;
use crate::error::{DawgError, Result};
use crate::node::Node;
use crate::reference::NodeId;
use crate::table::Table;
use crate::utils::MyHash;

pub(crate) type Storage = Table<Node>;

impl Storage {
    pub fn node(&self, id: NodeId) -> &Node {
        self.value(id.index())
    }
}

/// Configuration of a [`Dawg`].
///
/// ```
/// use dawg_rs::dawg::{Dawg, DawgConfig};
///
/// let dawg = Dawg::new(DawgConfig::default().with_bucket_bits(16).with_reserved(None));
/// assert!(dawg.insert("a\0b").unwrap());
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DawgConfig {
    /// The unique table starts with `2^bucket_bits` buckets (`0..=24`) and doubles as it fills.
    pub bucket_bits: usize,
    /// Symbol that stored strings must not contain.
    ///
    /// Defaults to `'\0'`, the separator used by key/value encodings on top of the set.
    pub reserved: Option<char>,
}

impl Default for DawgConfig {
    fn default() -> Self {
        Self {
            bucket_bits: 12,
            reserved: Some('\0'),
        }
    }
}

impl DawgConfig {
    pub fn with_bucket_bits(mut self, bucket_bits: usize) -> Self {
        self.bucket_bits = bucket_bits;
        self
    }

    pub fn with_reserved(mut self, reserved: Option<char>) -> Self {
        self.reserved = reserved;
        self
    }
}

/// A mutable minimal acyclic DFA over strings, used as an ordered string set.
///
/// ```
/// use dawg_rs::dawg::Dawg;
///
/// let dawg = Dawg::default();
/// for word in ["cat", "car", "cart", "dog"] {
///     dawg.insert(word).unwrap();
/// }
/// assert_eq!(dawg.len(), 4);
/// assert_eq!(dawg.first().as_deref(), Some("car"));
/// assert_eq!(dawg.floor("care").as_deref(), Some("car"));
/// assert_eq!(dawg.ceiling("care").as_deref(), Some("cart"));
/// ```
pub struct Dawg {
    storage: RefCell<Storage>,
    root: Cell<NodeId>,
    size: Cell<usize>,
    alphabet: RefCell<Alphabet>,
    generation: Cell<u64>,
    config: DawgConfig,
}

impl Dawg {
    pub fn new(config: DawgConfig) -> Self {
        let storage = Storage::new(config.bucket_bits);
        let dawg = Self {
            storage: RefCell::new(storage),
            root: Cell::new(NodeId::new(0)),
            size: Cell::new(0),
            alphabet: RefCell::new(Alphabet::Identity),
            generation: Cell::new(0),
            config,
        };
        dawg.reset_root();
        dawg
    }

    /// Install the canonical empty node as the root of an empty table.
    pub(crate) fn reset_root(&self) {
        let mut storage = self.storage_mut();
        let root = canonicalize(&mut storage, Node::new(false));
        storage.retain(root.index());
        self.root.set(root);
    }
}

impl Default for Dawg {
    fn default() -> Self {
        Dawg::new(DawgConfig::default())
    }
}

impl Debug for Dawg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage();
        f.debug_struct("Dawg")
            .field("size", &self.size.get())
            .field("root", &self.root.get())
            .field("nodes", &storage.real_size())
            .field("capacity", &storage.capacity())
            .field("alphabet_optimized", &self.alphabet().is_dense())
            .field("generation", &self.generation.get())
            .finish()
    }
}

impl Dawg {
    pub(crate) fn storage(&self) -> std::cell::Ref<'_, Storage> {
        self.storage.borrow()
    }
    pub(crate) fn storage_mut(&self) -> std::cell::RefMut<'_, Storage> {
        self.storage.borrow_mut()
    }

    pub(crate) fn alphabet(&self) -> std::cell::Ref<'_, Alphabet> {
        self.alphabet.borrow()
    }
    pub(crate) fn set_alphabet(&self, alphabet: Alphabet) {
        *self.alphabet.borrow_mut() = alphabet;
    }

    pub(crate) fn set_root(&self, root: NodeId) {
        self.root.set(root);
    }
    pub(crate) fn set_len(&self, size: usize) {
        self.size.set(size);
    }

    /// Invalidate every open iterator.
    pub(crate) fn bump_generation(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    pub fn config(&self) -> &DawgConfig {
        &self.config
    }

    /// Modification counter, incremented by every structural change.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn root(&self) -> NodeId {
        self.root.get()
    }

    /// Number of stored strings.
    pub fn len(&self) -> usize {
        self.size.get()
    }

    pub fn is_empty(&self) -> bool {
        self.size.get() == 0
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.storage().real_size()
    }

    /// Number of transitions over all live nodes.
    pub fn transition_count(&self) -> usize {
        let storage = self.storage();
        storage.indices().map(|i| storage[i].degree()).sum()
    }

    pub fn is_alphabet_optimized(&self) -> bool {
        self.alphabet().is_dense()
    }

    /// Number of symbols in the optimized alphabet, `None` if not optimized.
    pub fn alphabet_size(&self) -> Option<usize> {
        self.alphabet().len()
    }

    pub fn is_accepting(&self, id: NodeId) -> bool {
        self.storage().node(id).is_accepting()
    }

    /// Outgoing transitions of a node in ascending symbol order.
    pub fn children(&self, id: NodeId) -> Vec<(char, NodeId)> {
        let storage = self.storage();
        let alphabet = self.alphabet();
        storage
            .node(id)
            .edges()
            .iter()
            .map(|&(label, child)| (alphabet.decode(label), child))
            .collect()
    }

    pub fn child(&self, id: NodeId, symbol: char) -> Option<NodeId> {
        let label = self.alphabet().encode(symbol)?;
        self.storage().node(id).child(label)
    }

    /// Structural signature of a node.
    pub fn signature(&self, id: NodeId) -> u64 {
        MyHash::hash(self.storage().node(id))
    }

    /// Number of parents of a node (plus one for the root).
    pub fn refs(&self, id: NodeId) -> u32 {
        self.storage().refs(id.index())
    }

    /// Node reached from the root by consuming `prefix`.
    pub fn node_at(&self, prefix: &str) -> Option<NodeId> {
        let storage = self.storage();
        let alphabet = self.alphabet();
        self.descend(&storage, &alphabet, prefix)
    }

    pub(crate) fn descend(&self, storage: &Storage, alphabet: &Alphabet, prefix: &str) -> Option<NodeId> {
        prefix.chars().try_fold(self.root(), |node, symbol| {
            let label = alphabet.encode(symbol)?;
            storage.node(node).child(label)
        })
    }

    pub fn contains(&self, s: &str) -> bool {
        self.node_at(s).is_some_and(|id| self.is_accepting(id))
    }

    /// Check the string against the reserved symbol and the alphabet, and encode it.
    pub(crate) fn encode_for_insert(&self, s: &str) -> Result<Vec<u32>> {
        if let Some(reserved) = self.config.reserved {
            if s.contains(reserved) {
                return Err(DawgError::InvalidArgument(format!(
                    "string {:?} contains the reserved symbol {:?}",
                    s, reserved
                )));
            }
        }
        self.alphabet()
            .encode_str(s)
            .map_err(DawgError::SymbolOutsideAlphabet)
    }

    /// Remap all transition labels to a dense, order-preserving range.
    ///
    /// The mapping covers exactly the symbols present now. It is built once:
    /// afterwards this returns `false`, and inserting strings with symbols outside
    /// of it fails with [`DawgError::SymbolOutsideAlphabet`]. Only [`Dawg::clear`]
    /// goes back to the unrestricted alphabet.
    ///
    /// ```
    /// use dawg_rs::dawg::Dawg;
    ///
    /// let dawg = Dawg::from_strings(["beta", "alpha"]).unwrap();
    /// assert!(dawg.optimize_alphabet());
    /// assert!(dawg.is_alphabet_optimized());
    /// assert_eq!(dawg.alphabet_size(), Some(7));
    /// assert_eq!(dawg.first().as_deref(), Some("alpha"));
    /// assert!(dawg.insert("gamma").is_err());
    /// ```
    pub fn optimize_alphabet(&self) -> bool {
        if self.is_alphabet_optimized() {
            debug!("optimize_alphabet: already optimized");
            return false;
        }

        let mut storage = self.storage_mut();
        let indices: Vec<usize> = storage.indices().collect();
        let identity = Alphabet::Identity;
        let dense = Alphabet::dense(
            indices
                .iter()
                .flat_map(|&i| storage[i].edges().iter().map(|&(label, _)| identity.decode(label)))
                .collect::<Vec<char>>(),
        );
        debug!(
            "optimize_alphabet: {} symbols over {} nodes",
            dense.len().unwrap_or(0),
            indices.len()
        );

        for &i in indices.iter() {
            storage.value_mut(i).relabel(|label| {
                dense
                    .encode(identity.decode(label))
                    .expect("Every present symbol is in the dense alphabet")
            });
        }
        storage.rehash();
        drop(storage);

        self.set_alphabet(dense);
        self.bump_generation();
        true
    }
}
