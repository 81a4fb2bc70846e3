//! Lazy, ordered, fail-fast iteration over stored strings.
//!
//! [`Strings`] walks the graph depth-first with an explicit stack, one frame per
//! node on the current path, and keeps the current string in a single buffer.
//! Ascending iteration reports a string when its node is entered (a string sorts
//! before its extensions); descending iteration reports it when the node is left.
//!
//! Branches lying entirely outside of the range are skipped without being entered.
//! Once a branch lies entirely past the far end of the range, iteration stops.

use std::iter::FusedIterator;

use log::debug;

use crate::dawg::Dawg;
use crate::error::{DawgError, Result};
use crate::navigate::Direction;
use crate::range::Range;
use crate::reference::NodeId;

/// Additional condition on reported strings.
#[derive(Debug, Clone)]
pub(crate) enum Filter {
    All,
    EndsWith(String),
    Contains(String),
}

impl Filter {
    fn accepts(&self, s: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::EndsWith(suffix) => s.ends_with(suffix.as_str()),
            Filter::Contains(needle) => s.contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Frame {
    node: NodeId,
    /// Number of transitions already taken.
    cursor: usize,
    entered: bool,
    /// Whether reaching this node appended a symbol to the buffer.
    pushed: bool,
}

impl Frame {
    fn new(node: NodeId, pushed: bool) -> Self {
        Self {
            node,
            cursor: 0,
            entered: false,
            pushed,
        }
    }
}

/// Iterator over stored strings.
///
/// Yields `Err(DawgError::ConcurrentModification)` once and then ends if the
/// automaton is modified while the iterator is alive.
#[derive(Debug)]
pub struct Strings<'a> {
    dawg: &'a Dawg,
    generation: u64,
    direction: Direction,
    range: Range,
    filter: Filter,
    stack: Vec<Frame>,
    buffer: String,
    finished: bool,
}

impl<'a> Strings<'a> {
    pub(crate) fn new(dawg: &'a Dawg, prefix: &str, range: Range, direction: Direction, filter: Filter) -> Self {
        let mut stack = Vec::new();
        if let Some(scope) = dawg.node_at(prefix) {
            stack.push(Frame::new(scope, false));
        }
        Self {
            dawg,
            generation: dawg.generation(),
            direction,
            range,
            filter,
            stack,
            buffer: prefix.to_string(),
            finished: false,
        }
    }

    /// Iterator that yields nothing.
    pub(crate) fn empty(dawg: &'a Dawg) -> Self {
        let mut strings = Self::new(dawg, "", Range::full(), Direction::Forward, Filter::All);
        strings.finish();
        strings
    }

    fn finish(&mut self) {
        self.finished = true;
        self.stack.clear();
    }

    fn accepts(&self) -> bool {
        self.range.contains(&self.buffer) && self.filter.accepts(&self.buffer)
    }
}

impl<'a> Iterator for Strings<'a> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.dawg.generation() != self.generation {
            debug!("Strings: generation changed from {}", self.generation);
            self.finish();
            return Some(Err(DawgError::ConcurrentModification));
        }

        let dawg = self.dawg;
        let storage = dawg.storage();
        let alphabet = dawg.alphabet();

        while let Some(&frame) = self.stack.last() {
            let top = self.stack.len() - 1;
            let node = storage.node(frame.node);

            if self.direction == Direction::Forward && !frame.entered {
                self.stack[top].entered = true;
                if node.is_accepting() && self.accepts() {
                    return Some(Ok(self.buffer.clone()));
                }
            }

            let degree = node.degree();
            if frame.cursor < degree {
                self.stack[top].cursor += 1;
                let i = match self.direction {
                    Direction::Forward => frame.cursor,
                    Direction::Backward => degree - 1 - frame.cursor,
                };
                let (label, child) = node.edges()[i];
                self.buffer.push(alphabet.decode(label));

                let (skip, stop) = match self.direction {
                    Direction::Forward => (
                        self.range.subtree_below(&self.buffer),
                        self.range.subtree_above(&self.buffer),
                    ),
                    Direction::Backward => (
                        self.range.subtree_above(&self.buffer),
                        self.range.subtree_below(&self.buffer),
                    ),
                };
                if stop {
                    self.finish();
                    return None;
                }
                if skip {
                    self.buffer.pop();
                } else {
                    self.stack.push(Frame::new(child, true));
                }
                continue;
            }

            self.stack.pop();
            let found = self.direction == Direction::Backward && node.is_accepting() && self.accepts();
            let result = found.then(|| self.buffer.clone());
            if frame.pushed {
                self.buffer.pop();
            }
            if let Some(s) = result {
                return Some(Ok(s));
            }
        }

        self.finished = true;
        None
    }
}

impl FusedIterator for Strings<'_> {}

impl Dawg {
    /// All stored strings in ascending order.
    pub fn iter(&self) -> Strings<'_> {
        Strings::new(self, "", Range::full(), Direction::Forward, Filter::All)
    }

    /// All stored strings in descending order.
    pub fn iter_rev(&self) -> Strings<'_> {
        Strings::new(self, "", Range::full(), Direction::Backward, Filter::All)
    }

    /// Stored strings starting with `prefix`, in ascending order.
    ///
    /// Only the part of the graph below `prefix` is visited.
    pub fn strings_starting_with(&self, prefix: &str) -> Strings<'_> {
        Strings::new(self, prefix, Range::full(), Direction::Forward, Filter::All)
    }

    /// Stored strings ending with `suffix`, in ascending order.
    ///
    /// This scans every stored string: the cost is proportional to [`Dawg::len`]
    /// rather than to the number of matches.
    pub fn strings_ending_with(&self, suffix: &str) -> Strings<'_> {
        Strings::new(
            self,
            "",
            Range::full(),
            Direction::Forward,
            Filter::EndsWith(suffix.to_string()),
        )
    }

    /// Stored strings containing `needle`, in ascending order.
    ///
    /// Like [`Dawg::strings_ending_with`], this scans every stored string.
    pub fn strings_containing(&self, needle: &str) -> Strings<'_> {
        Strings::new(
            self,
            "",
            Range::full(),
            Direction::Forward,
            Filter::Contains(needle.to_string()),
        )
    }
}

impl<'a> IntoIterator for &'a Dawg {
    type Item = Result<String>;
    type IntoIter = Strings<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use test_log::test;

    use super::*;

    fn collect(strings: Strings<'_>) -> Vec<String> {
        strings.collect::<Result<Vec<_>>>().unwrap()
    }

    fn sample() -> Dawg {
        Dawg::from_strings(["cat", "car", "cart", "dog", "do", ""]).unwrap()
    }

    #[test]
    fn test_ascending() {
        let dawg = sample();
        assert_eq!(collect(dawg.iter()), vec!["", "car", "cart", "cat", "do", "dog"]);
    }

    #[test]
    fn test_descending() {
        let dawg = sample();
        assert_eq!(collect(dawg.iter_rev()), vec!["dog", "do", "cat", "cart", "car", ""]);
    }

    #[test]
    fn test_into_iterator() {
        let dawg = Dawg::from_strings(["b", "a"]).unwrap();
        let mut seen = Vec::new();
        for s in &dawg {
            seen.push(s.unwrap());
        }
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_empty() {
        let dawg = Dawg::default();
        assert_eq!(dawg.iter().count(), 0);
        assert_eq!(Strings::empty(&sample()).count(), 0);
    }

    #[test]
    fn test_starting_with() {
        let dawg = sample();
        assert_eq!(collect(dawg.strings_starting_with("ca")), vec!["car", "cart", "cat"]);
        assert_eq!(collect(dawg.strings_starting_with("do")), vec!["do", "dog"]);
        assert_eq!(collect(dawg.strings_starting_with("cart")), vec!["cart"]);
        assert!(collect(dawg.strings_starting_with("x")).is_empty());
        assert_eq!(collect(dawg.strings_starting_with("")).len(), 6);
    }

    #[test]
    fn test_ending_with_and_containing() {
        let dawg = sample();
        assert_eq!(collect(dawg.strings_ending_with("t")), vec!["cart", "cat"]);
        assert_eq!(collect(dawg.strings_ending_with("")).len(), 6);
        assert_eq!(collect(dawg.strings_containing("ar")), vec!["car", "cart"]);
        assert_eq!(collect(dawg.strings_containing("o")), vec!["do", "dog"]);
    }

    #[test]
    fn test_ranged() {
        let dawg = sample();
        let range = Range::new(Bound::Excluded("car".into()), Bound::Included("do".into())).unwrap();
        let forward = Strings::new(&dawg, "", range.clone(), Direction::Forward, Filter::All);
        assert_eq!(collect(forward), vec!["cart", "cat", "do"]);
        let backward = Strings::new(&dawg, "", range, Direction::Backward, Filter::All);
        assert_eq!(collect(backward), vec!["do", "cat", "cart"]);
    }

    #[test]
    fn test_fail_fast() {
        let dawg = sample();
        let mut iter = dawg.iter();
        assert_eq!(iter.next(), Some(Ok(String::new())));
        dawg.insert("bee").unwrap();
        assert_eq!(iter.next(), Some(Err(DawgError::ConcurrentModification)));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_failed_insert_keeps_iterator_valid() {
        let dawg = sample();
        let mut iter = dawg.iter();
        iter.next();
        assert!(dawg.insert("bad\0").is_err());
        assert!(!dawg.remove("absent"));
        assert_eq!(iter.next(), Some(Ok("car".to_string())));
    }
}
