//! String ranges with inclusive, exclusive or missing bounds.

use std::ops::Bound;

use crate::error::{DawgError, Result};

/// A range of strings in code point order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Range {
    lower: Bound<String>,
    upper: Bound<String>,
}

impl Default for Range {
    fn default() -> Self {
        Self::full()
    }
}

impl Range {
    /// The range containing every string.
    pub fn full() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    /// Create a range, rejecting a lower bound greater than the upper bound.
    ///
    /// Equal bounds are accepted even when one of them is exclusive; such a range
    /// is simply empty.
    pub fn new(lower: Bound<String>, upper: Bound<String>) -> Result<Self> {
        if let (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) = (&lower, &upper) {
            if l > u {
                return Err(DawgError::InvalidArgument(format!(
                    "bounds are inverted: {:?} > {:?}",
                    l, u
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Bound<&str> {
        self.lower.as_ref().map(String::as_str)
    }

    pub fn upper(&self) -> Bound<&str> {
        self.upper.as_ref().map(String::as_str)
    }

    pub fn contains(&self, s: &str) -> bool {
        !self.below_lower(s) && !self.above_upper(s)
    }

    /// Whether `s` lies before the range.
    pub fn below_lower(&self, s: &str) -> bool {
        match &self.lower {
            Bound::Included(b) => s < b.as_str(),
            Bound::Excluded(b) => s <= b.as_str(),
            Bound::Unbounded => false,
        }
    }

    /// Whether `s` lies after the range.
    pub fn above_upper(&self, s: &str) -> bool {
        match &self.upper {
            Bound::Included(b) => s > b.as_str(),
            Bound::Excluded(b) => s >= b.as_str(),
            Bound::Unbounded => false,
        }
    }

    /// Whether a bound of a narrower range may sit at this position.
    ///
    /// An inclusive bound must be a member of the range. An exclusive bound may
    /// also coincide with an exclusive end of the range.
    pub fn admits(&self, bound: Bound<&str>) -> bool {
        match bound {
            Bound::Included(v) => self.contains(v),
            Bound::Excluded(v) => {
                let above_lower = match &self.lower {
                    Bound::Included(b) | Bound::Excluded(b) => v >= b.as_str(),
                    Bound::Unbounded => true,
                };
                let below_upper = match &self.upper {
                    Bound::Included(b) | Bound::Excluded(b) => v <= b.as_str(),
                    Bound::Unbounded => true,
                };
                above_lower && below_upper
            }
            Bound::Unbounded => true,
        }
    }

    /// Whether every string starting with `prefix` lies before the range.
    pub fn subtree_below(&self, prefix: &str) -> bool {
        match &self.lower {
            Bound::Included(b) | Bound::Excluded(b) => prefix < b.as_str() && !b.starts_with(prefix),
            Bound::Unbounded => false,
        }
    }

    /// Whether every string starting with `prefix` lies after the range.
    pub fn subtree_above(&self, prefix: &str) -> bool {
        self.above_upper(prefix)
    }

    /// The range of strings contained in both `self` and `other`.
    ///
    /// The result may be empty, but it is never inverted in the sense of [`Range::new`]
    /// unless the two ranges are disjoint.
    pub fn intersect(&self, other: &Range) -> Range {
        Range {
            lower: tighter(&self.lower, &other.lower, |a, b| a > b),
            upper: tighter(&self.upper, &other.upper, |a, b| a < b),
        }
    }

    /// Whether the range contains no string at all.
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Included(l), Bound::Included(u)) => l > u,
            (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) => l >= u,
            _ => false,
        }
    }
}

/// Pick the more restrictive of two bounds on the same side.
///
/// `stricter(a, b)` tells whether the value `a` restricts more than `b`. On equal
/// values an exclusive bound wins.
fn tighter(a: &Bound<String>, b: &Bound<String>, stricter: impl Fn(&str, &str) -> bool) -> Bound<String> {
    match (a, b) {
        (Bound::Unbounded, other) | (other, Bound::Unbounded) => other.clone(),
        (Bound::Included(x) | Bound::Excluded(x), Bound::Included(y) | Bound::Excluded(y)) => {
            if stricter(x, y) {
                a.clone()
            } else if stricter(y, x) {
                b.clone()
            } else if matches!(a, Bound::Excluded(_)) {
                a.clone()
            } else {
                b.clone()
            }
        }
    }
}
