//! Symbol ↔ transition label mapping.
//!
//! Transitions are labelled with `u32`. By default a label is just the code point
//! of the symbol ([`Alphabet::Identity`]). After [`Dawg::optimize_alphabet`] the
//! labels become dense indices `0..n` into the sorted list of symbols that were
//! present at that moment ([`Alphabet::Dense`]).
//!
//! Both encodings are strictly order-preserving: `a < b` iff `label(a) < label(b)`.
//! This is what keeps navigation and iteration order unaffected by the optimization.
//!
//! Query strings may contain symbols the dense alphabet does not know. Such a symbol
//! cannot match any edge, but it still has a well-defined position between two
//! known symbols, captured by [`Probe::Miss`].
//!
//! [`Dawg::optimize_alphabet`]: crate::dawg::Dawg::optimize_alphabet

use std::collections::BTreeSet;

/// Mapping between symbols and transition labels.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum Alphabet {
    /// Label is the code point of the symbol.
    #[default]
    Identity,
    /// Label is the index of the symbol in a sorted, deduplicated symbol list.
    Dense(Vec<char>),
}

/// Position of a query symbol relative to the transition labels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Probe {
    /// The symbol is in the alphabet and has this label.
    Hit(u32),
    /// The symbol is not in the alphabet; it sorts right before this label.
    Miss(u32),
}

impl Alphabet {
    /// Create a dense alphabet over the given symbols.
    pub fn dense(symbols: impl IntoIterator<Item = char>) -> Self {
        let symbols: BTreeSet<char> = symbols.into_iter().collect();
        Alphabet::Dense(symbols.into_iter().collect())
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Alphabet::Dense(_))
    }

    /// Number of symbols in a dense alphabet, `None` for the identity mapping.
    pub fn len(&self) -> Option<usize> {
        match self {
            Alphabet::Identity => None,
            Alphabet::Dense(symbols) => Some(symbols.len()),
        }
    }

    /// Label under which the symbol is stored, if it can be stored at all.
    pub fn encode(&self, symbol: char) -> Option<u32> {
        match self.probe(symbol) {
            Probe::Hit(label) => Some(label),
            Probe::Miss(_) => None,
        }
    }

    /// Locate the symbol among the labels.
    pub fn probe(&self, symbol: char) -> Probe {
        match self {
            Alphabet::Identity => Probe::Hit(symbol as u32),
            Alphabet::Dense(symbols) => match symbols.binary_search(&symbol) {
                Ok(i) => Probe::Hit(i as u32),
                Err(i) => Probe::Miss(i as u32),
            },
        }
    }

    /// Symbol stored under the given label.
    pub fn decode(&self, label: u32) -> char {
        match self {
            Alphabet::Identity => char::from_u32(label).expect("Identity labels are always valid code points"),
            Alphabet::Dense(symbols) => symbols[label as usize],
        }
    }

    /// Encode a whole string, or return the first symbol that cannot be stored.
    pub fn encode_str(&self, s: &str) -> Result<Vec<u32>, char> {
        s.chars().map(|c| self.encode(c).ok_or(c)).collect()
    }

    pub fn probe_str(&self, s: &str) -> Vec<Probe> {
        s.chars().map(|c| self.probe(c)).collect()
    }

    /// Append decoded labels to `out`.
    pub fn decode_into(&self, labels: &[u32], out: &mut String) {
        out.extend(labels.iter().map(|&label| self.decode(label)));
    }
}
