use thiserror::Error;

/// Errors reported by the automaton and its views.
///
/// Absence is never an error: lookups, removals and navigation report it through
/// `bool` or `Option` results.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DawgError {
    /// The argument is rejected up front: a string containing the reserved symbol,
    /// inverted range bounds, or an insertion outside of a view's range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The alphabet was optimized and does not contain this symbol.
    #[error("symbol {0:?} is outside of the optimized alphabet")]
    SymbolOutsideAlphabet(char),

    /// The automaton was modified while an iterator over it was open.
    #[error("automaton was modified during iteration")]
    ConcurrentModification,
}

pub type Result<T> = std::result::Result<T, DawgError>;
