//! # dawg-rs: mutable minimal DAWGs in Rust
//!
//! **`dawg-rs`** stores a set of strings as a **minimal acyclic deterministic finite
//! automaton** (a DAWG) and exposes it as an ordered set: membership, insertion and
//! removal, lexicographic navigation and live range/prefix/suffix views.
//!
//! ## What is a DAWG?
//!
//! A directed acyclic word graph is a trie in which equal subtrees are merged. Strings
//! that share a suffix, like "test**ing**" and "rest**ing**", share the nodes spelling
//! it. The automaton is kept **minimal** after every insertion and removal: no two
//! states recognize the same set of suffixes.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`Dawg`][crate::dawg::Dawg]
//!   manager, which owns the node table and hash-conses every node it creates.
//! - **Copy-on-Write Paths**: Canonical nodes are immutable; mutations rebuild only
//!   the path of the changed string and reclaim unreachable nodes by reference counting.
//! - **Ordered Set Surface**: `first`, `last`, `lower`, `floor`, `ceiling`, `higher`,
//!   `poll_first`, `poll_last`, bounded and prefix views, descending order.
//! - **Alphabet Compaction**: [`optimize_alphabet`][crate::dawg::Dawg::optimize_alphabet]
//!   remaps the symbols in use to a dense, order-preserving label range.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dawg_rs::dawg::Dawg;
//!
//! let dawg = Dawg::default();
//! for word in ["cat", "car", "cart", "dog"] {
//!     dawg.insert(word).unwrap();
//! }
//!
//! assert!(dawg.contains("cart"));
//! assert_eq!(dawg.first().as_deref(), Some("car"));
//! assert_eq!(dawg.higher("cart").as_deref(), Some("cat"));
//!
//! let ca: Vec<String> = dawg.strings_starting_with("ca").map(|s| s.unwrap()).collect();
//! assert_eq!(ca, ["car", "cart", "cat"]);
//!
//! let view = dawg.sub_set("b", true, "d", false).unwrap();
//! assert_eq!(view.len(), 3);
//! ```
//!
//! ## Core Components
//!
//! - **[`dawg`]**: The [`Dawg`][crate::dawg::Dawg] manager and its configuration.
//! - **[`builder`]** and **[`mutation`]**: insertion, removal and node reclamation.
//! - **[`navigate`]**, **[`view`]** and **[`iter`]**: ordered-set queries.
//! - **[`dot`]**: Utilities for visualizing the automaton using Graphviz.

pub mod alphabet;
pub mod builder;
pub mod dawg;
pub mod debug;
pub mod dot;
pub mod error;
pub mod iter;
pub mod mutation;
pub mod navigate;
pub mod node;
pub mod range;
pub mod reference;
pub mod table;
pub mod utils;
pub mod view;
