//! Live restricted views of an automaton.
//!
//! A [`DawgView`] is a range of strings, an optional common prefix and a direction,
//! borrowed on top of a [`Dawg`]. It never copies nodes: every query is answered
//! by the automaton and then clamped to the view. Writes through a view go to the
//! underlying automaton, so they are visible through every other view and iterator
//! (the latter fail fast).
//!
//! Arguments of a descending view are interpreted in descending order, e.g.
//! `head_set(s)` of a descending view holds the strings greater than `s`.

use std::ops::Bound;

use log::debug;

use crate::dawg::Dawg;
use crate::error::{DawgError, Result};
use crate::iter::{Filter, Strings};
use crate::navigate::Direction;
use crate::range::Range;

fn bound(s: &str, inclusive: bool) -> Bound<String> {
    if inclusive {
        Bound::Included(s.to_string())
    } else {
        Bound::Excluded(s.to_string())
    }
}

/// A subset of an automaton's strings, in ascending or descending order.
///
/// ```
/// use dawg_rs::dawg::Dawg;
///
/// let dawg = Dawg::from_strings(["cat", "car", "cart", "dog"]).unwrap();
/// let view = dawg.prefix_set("ca");
/// let strings: Vec<String> = view.iter().map(|s| s.unwrap()).collect();
/// assert_eq!(strings, ["car", "cart", "cat"]);
/// assert_eq!(view.descending_set().first().as_deref(), Some("cat"));
/// ```
#[derive(Debug, Clone)]
pub struct DawgView<'a> {
    dawg: &'a Dawg,
    prefix: String,
    range: Range,
    descending: bool,
    /// Set when nested prefixes exclude each other.
    disjoint: bool,
}

impl<'a> DawgView<'a> {
    pub(crate) fn new(dawg: &'a Dawg) -> Self {
        Self {
            dawg,
            prefix: String::new(),
            range: Range::full(),
            descending: false,
            disjoint: false,
        }
    }

    pub fn dawg(&self) -> &'a Dawg {
        self.dawg
    }

    /// Common prefix of all strings in the view.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Bounds of the view, in ascending order.
    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    fn direction(&self) -> Direction {
        if self.descending {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    /// Whether `s` belongs to the view's scope, regardless of being stored.
    pub fn in_scope(&self, s: &str) -> bool {
        !self.disjoint && s.starts_with(self.prefix.as_str()) && self.range.contains(s)
    }

    pub fn contains(&self, s: &str) -> bool {
        self.in_scope(s) && self.dawg.contains(s)
    }

    /// Number of strings in the view.
    ///
    /// This counts by iterating over the view.
    pub fn len(&self) -> usize {
        self.iter().filter(|s| s.is_ok()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.disjoint || self.range.is_empty() || self.natural_first().is_none()
    }

    // Navigation in ascending order, clamped to the bounds.

    fn natural_first(&self) -> Option<String> {
        match self.range.lower() {
            Bound::Included(b) => self.natural_next(b, true),
            Bound::Excluded(b) => self.natural_next(b, false),
            Bound::Unbounded => {
                if self.disjoint {
                    return None;
                }
                let s = self.dawg.extreme_in(&self.prefix, Direction::Forward)?;
                (!self.range.above_upper(&s)).then_some(s)
            }
        }
    }

    fn natural_last(&self) -> Option<String> {
        match self.range.upper() {
            Bound::Included(b) => self.natural_prev(b, true),
            Bound::Excluded(b) => self.natural_prev(b, false),
            Bound::Unbounded => {
                if self.disjoint {
                    return None;
                }
                let s = self.dawg.extreme_in(&self.prefix, Direction::Backward)?;
                (!self.range.below_lower(&s)).then_some(s)
            }
        }
    }

    fn natural_next(&self, key: &str, inclusive: bool) -> Option<String> {
        if self.disjoint {
            return None;
        }
        let (key, inclusive) = if self.range.below_lower(key) {
            match self.range.lower() {
                Bound::Included(b) => (b, true),
                Bound::Excluded(b) => (b, false),
                Bound::Unbounded => unreachable!(),
            }
        } else {
            (key, inclusive)
        };
        let s = self.dawg.neighbor_in(&self.prefix, key, Direction::Forward, inclusive)?;
        (!self.range.above_upper(&s)).then_some(s)
    }

    fn natural_prev(&self, key: &str, inclusive: bool) -> Option<String> {
        if self.disjoint {
            return None;
        }
        let (key, inclusive) = if self.range.above_upper(key) {
            match self.range.upper() {
                Bound::Included(b) => (b, true),
                Bound::Excluded(b) => (b, false),
                Bound::Unbounded => unreachable!(),
            }
        } else {
            (key, inclusive)
        };
        let s = self.dawg.neighbor_in(&self.prefix, key, Direction::Backward, inclusive)?;
        (!self.range.below_lower(&s)).then_some(s)
    }

    /// First string in view order.
    pub fn first(&self) -> Option<String> {
        if self.descending {
            self.natural_last()
        } else {
            self.natural_first()
        }
    }

    /// Last string in view order.
    pub fn last(&self) -> Option<String> {
        if self.descending {
            self.natural_first()
        } else {
            self.natural_last()
        }
    }

    /// Nearest string strictly before `s` in view order.
    pub fn lower(&self, s: &str) -> Option<String> {
        if self.descending {
            self.natural_next(s, false)
        } else {
            self.natural_prev(s, false)
        }
    }

    /// Nearest string at or before `s` in view order.
    pub fn floor(&self, s: &str) -> Option<String> {
        if self.descending {
            self.natural_next(s, true)
        } else {
            self.natural_prev(s, true)
        }
    }

    /// Nearest string at or after `s` in view order.
    pub fn ceiling(&self, s: &str) -> Option<String> {
        if self.descending {
            self.natural_prev(s, true)
        } else {
            self.natural_next(s, true)
        }
    }

    /// Nearest string strictly after `s` in view order.
    pub fn higher(&self, s: &str) -> Option<String> {
        if self.descending {
            self.natural_prev(s, false)
        } else {
            self.natural_next(s, false)
        }
    }

    pub fn poll_first(&self) -> Option<String> {
        let s = self.first()?;
        self.dawg.remove(&s);
        Some(s)
    }

    pub fn poll_last(&self) -> Option<String> {
        let s = self.last()?;
        self.dawg.remove(&s);
        Some(s)
    }

    /// Add a string to the underlying automaton.
    ///
    /// Fails with [`DawgError::InvalidArgument`] if the string is outside of the view.
    pub fn insert(&self, s: &str) -> Result<bool> {
        if !self.in_scope(s) {
            return Err(DawgError::InvalidArgument(format!("{:?} is outside of the view", s)));
        }
        self.dawg.insert(s)
    }

    /// Remove a string from the underlying automaton, if it is in the view.
    pub fn remove(&self, s: &str) -> bool {
        self.in_scope(s) && self.dawg.remove(s)
    }

    fn strings(&self, prefix: &str, filter: Filter) -> Strings<'a> {
        if self.disjoint {
            return Strings::empty(self.dawg);
        }
        Strings::new(self.dawg, prefix, self.range.clone(), self.direction(), filter)
    }

    /// Strings of the view in view order.
    pub fn iter(&self) -> Strings<'a> {
        self.strings(&self.prefix, Filter::All)
    }

    pub fn strings_starting_with(&self, prefix: &str) -> Strings<'a> {
        self.prefix_set(prefix).iter()
    }

    /// Strings of the view ending with `suffix`; scans the whole view.
    pub fn strings_ending_with(&self, suffix: &str) -> Strings<'a> {
        self.strings(&self.prefix, Filter::EndsWith(suffix.to_string()))
    }

    /// Strings of the view containing `needle`; scans the whole view.
    pub fn strings_containing(&self, needle: &str) -> Strings<'a> {
        self.strings(&self.prefix, Filter::Contains(needle.to_string()))
    }

    /// Narrow the view to the given ascending bounds.
    fn narrow(&self, lower: Bound<String>, upper: Bound<String>) -> Result<Self> {
        let range = Range::new(lower, upper)?;
        for bound in [range.lower(), range.upper()] {
            if !self.range.admits(bound) {
                return Err(DawgError::InvalidArgument(format!(
                    "bound {:?} is outside of the view",
                    bound
                )));
            }
        }
        debug!("narrow: {:?} within {:?}", range, self.range);
        Ok(Self {
            range: self.range.intersect(&range),
            ..self.clone()
        })
    }

    /// Strings between `from` and `to` in view order.
    pub fn sub_set(&self, from: &str, from_inclusive: bool, to: &str, to_inclusive: bool) -> Result<Self> {
        let from = bound(from, from_inclusive);
        let to = bound(to, to_inclusive);
        if self.descending {
            self.narrow(to, from)
        } else {
            self.narrow(from, to)
        }
    }

    /// Strings before `to` in view order.
    pub fn head_set(&self, to: &str, inclusive: bool) -> Result<Self> {
        let to = bound(to, inclusive);
        if self.descending {
            self.narrow(to, Bound::Unbounded)
        } else {
            self.narrow(Bound::Unbounded, to)
        }
    }

    /// Strings after `from` in view order.
    pub fn tail_set(&self, from: &str, inclusive: bool) -> Result<Self> {
        let from = bound(from, inclusive);
        if self.descending {
            self.narrow(Bound::Unbounded, from)
        } else {
            self.narrow(from, Bound::Unbounded)
        }
    }

    /// Strings of the view starting with `prefix`.
    pub fn prefix_set(&self, prefix: &str) -> Self {
        let mut view = self.clone();
        if prefix.starts_with(self.prefix.as_str()) {
            view.prefix = prefix.to_string();
        } else if !self.prefix.starts_with(prefix) {
            view.disjoint = true;
        }
        view
    }

    /// The same strings in reverse order.
    pub fn descending_set(&self) -> Self {
        Self {
            descending: !self.descending,
            ..self.clone()
        }
    }
}

impl<'a> IntoIterator for &DawgView<'a> {
    type Item = Result<String>;
    type IntoIter = Strings<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Dawg {
    /// Unrestricted view of the whole set.
    pub fn view(&self) -> DawgView<'_> {
        DawgView::new(self)
    }

    /// Strings between `from` and `to`.
    ///
    /// Fails with [`DawgError::InvalidArgument`] if `from > to`.
    pub fn sub_set(&self, from: &str, from_inclusive: bool, to: &str, to_inclusive: bool) -> Result<DawgView<'_>> {
        self.view().sub_set(from, from_inclusive, to, to_inclusive)
    }

    /// Strings less than (or equal to) `to`.
    pub fn head_set(&self, to: &str, inclusive: bool) -> Result<DawgView<'_>> {
        self.view().head_set(to, inclusive)
    }

    /// Strings greater than (or equal to) `from`.
    pub fn tail_set(&self, from: &str, inclusive: bool) -> Result<DawgView<'_>> {
        self.view().tail_set(from, inclusive)
    }

    /// Strings starting with `prefix`.
    pub fn prefix_set(&self, prefix: &str) -> DawgView<'_> {
        self.view().prefix_set(prefix)
    }

    /// All strings in descending order.
    pub fn descending_set(&self) -> DawgView<'_> {
        self.view().descending_set()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn sample() -> Dawg {
        Dawg::from_strings(["apple", "banana", "band", "bandana", "can", "cane", "dog"]).unwrap()
    }

    fn collect(view: &DawgView<'_>) -> Vec<String> {
        view.iter().collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_sub_set() {
        let dawg = sample();
        let view = dawg.sub_set("b", true, "can", true).unwrap();
        assert_eq!(collect(&view), vec!["banana", "band", "bandana", "can"]);
        assert_eq!(view.len(), 4);
        assert_eq!(view.first().as_deref(), Some("banana"));
        assert_eq!(view.last().as_deref(), Some("can"));
        assert!(view.contains("band"));
        assert!(!view.contains("apple"));
        assert!(!view.contains("cane"));

        let view = dawg.sub_set("band", false, "can", false).unwrap();
        assert_eq!(collect(&view), vec!["bandana"]);
    }

    #[test]
    fn test_inverted_bounds() {
        let dawg = sample();
        assert!(matches!(
            dawg.sub_set("z", true, "a", true),
            Err(DawgError::InvalidArgument(_))
        ));
        let view = dawg.sub_set("b", false, "b", false).unwrap();
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_head_and_tail() {
        let dawg = sample();
        let head = dawg.head_set("band", false).unwrap();
        assert_eq!(collect(&head), vec!["apple", "banana"]);
        let tail = dawg.tail_set("cane", true).unwrap();
        assert_eq!(collect(&tail), vec!["cane", "dog"]);
        assert_eq!(tail.first().as_deref(), Some("cane"));
        assert_eq!(head.last().as_deref(), Some("banana"));
    }

    #[test]
    fn test_navigation_is_clamped() {
        let dawg = sample();
        let view = dawg.sub_set("b", true, "c", true).unwrap();
        assert_eq!(view.ceiling("a").as_deref(), Some("banana"));
        assert_eq!(view.floor("z").as_deref(), Some("bandana"));
        assert_eq!(view.higher("bandana"), None);
        assert_eq!(view.lower("banana"), None);
        assert_eq!(view.lower("bandana").as_deref(), Some("band"));
        assert_eq!(view.higher("band").as_deref(), Some("bandana"));
    }

    #[test]
    fn test_nested_views() {
        let dawg = sample();
        let outer = dawg.sub_set("b", true, "d", false).unwrap();
        let inner = outer.sub_set("band", true, "cane", false).unwrap();
        assert_eq!(collect(&inner), vec!["band", "bandana", "can"]);
        assert!(matches!(
            outer.sub_set("a", true, "c", true),
            Err(DawgError::InvalidArgument(_))
        ));
        assert!(matches!(outer.tail_set("d", true), Err(DawgError::InvalidArgument(_))));
        assert!(outer.head_set("d", false).is_ok());
    }

    #[test]
    fn test_prefix_set() {
        let dawg = sample();
        let view = dawg.prefix_set("ban");
        assert_eq!(collect(&view), vec!["banana", "band", "bandana"]);
        assert_eq!(view.first().as_deref(), Some("banana"));
        assert_eq!(view.last().as_deref(), Some("bandana"));
        assert_eq!(view.ceiling("a").as_deref(), Some("banana"));
        assert_eq!(view.floor("c"), Some("bandana".to_string()));
        assert_eq!(view.higher("bandana"), None);
        assert!(!view.contains("can"));

        assert_eq!(collect(&view.prefix_set("band")), vec!["band", "bandana"]);
        assert_eq!(collect(&view.prefix_set("b")), vec!["banana", "band", "bandana"]);
        let disjoint = view.prefix_set("ca");
        assert!(disjoint.is_empty());
        assert_eq!(disjoint.len(), 0);
        assert_eq!(disjoint.first(), None);
    }

    #[test]
    fn test_descending_set() {
        let dawg = sample();
        let view = dawg.descending_set();
        assert_eq!(view.first().as_deref(), Some("dog"));
        assert_eq!(view.last().as_deref(), Some("apple"));
        assert_eq!(view.higher("can").as_deref(), Some("bandana"));
        assert_eq!(view.lower("can").as_deref(), Some("cane"));
        assert_eq!(view.ceiling("c").as_deref(), Some("bandana"));
        assert_eq!(view.floor("c").as_deref(), Some("can"));

        let head = view.head_set("can", false).unwrap();
        assert_eq!(collect(&head), vec!["dog", "cane"]);
        let sub = view.sub_set("cane", true, "band", true).unwrap();
        assert_eq!(collect(&sub), vec!["cane", "can", "bandana", "band"]);
        assert!(view.sub_set("band", true, "cane", true).is_err());

        assert_eq!(collect(&view.descending_set()), collect(&dawg.view()));
    }

    #[test]
    fn test_write_through() {
        let dawg = sample();
        let view = dawg.prefix_set("ca");
        assert_eq!(view.insert("cat"), Ok(true));
        assert!(dawg.contains("cat"));
        assert!(matches!(view.insert("dot"), Err(DawgError::InvalidArgument(_))));
        assert!(!dawg.contains("dot"));
        assert!(!view.remove("dog"));
        assert!(dawg.contains("dog"));
        assert!(view.remove("can"));
        assert!(!dawg.contains("can"));
    }

    #[test]
    fn test_poll_through_view() {
        let dawg = sample();
        let view = dawg.sub_set("b", true, "c", false).unwrap();
        assert_eq!(view.poll_first().as_deref(), Some("banana"));
        assert_eq!(view.poll_last().as_deref(), Some("bandana"));
        assert_eq!(collect(&view), vec!["band"]);
        assert_eq!(dawg.len(), 5);
    }

    #[test]
    fn test_view_filters() {
        let dawg = sample();
        let view = dawg.head_set("c", false).unwrap();
        let ending: Vec<String> = view.strings_ending_with("a").map(|s| s.unwrap()).collect();
        assert_eq!(ending, vec!["banana", "bandana"]);
        let containing: Vec<String> = view.strings_containing("nd").map(|s| s.unwrap()).collect();
        assert_eq!(containing, vec!["band", "bandana"]);
        let starting: Vec<String> = view.strings_starting_with("ba").map(|s| s.unwrap()).collect();
        assert_eq!(starting, vec!["banana", "band", "bandana"]);
    }
}
