//! Ordered-set navigation.
//!
//! All queries are answered by one walk along the query string followed by at most
//! one backtrack and one descent, so each costs `O(|key| + depth)` transition lookups
//! regardless of the number of stored strings.
//!
//! The query may contain symbols that can never be stored. Their position among the
//! transition labels comes from [`Alphabet::probe`], so the answers are the same as
//! for a plain sorted set of strings.

use log::debug;

use crate::alphabet::{Alphabet, Probe};
use crate::dawg::{Dawg, Storage};
use crate::reference::NodeId;

/// Direction of a navigation query or an iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    /// Towards greater strings.
    Forward,
    /// Towards smaller strings.
    Backward,
}

/// Labels of the least (`Forward`) or greatest (`Backward`) string accepted from `node`.
pub(crate) fn extreme(storage: &Storage, node: NodeId, direction: Direction) -> Option<Vec<u32>> {
    if storage.node(node).is_dead() {
        return None;
    }
    let mut labels = Vec::new();
    let mut current = node;
    loop {
        let node = storage.node(current);
        let edge = match direction {
            Direction::Forward if node.is_accepting() => None,
            Direction::Forward => node.first_edge(),
            Direction::Backward => node.last_edge(),
        };
        match edge {
            Some((label, child)) => {
                labels.push(label);
                current = child;
            }
            None => return Some(labels),
        }
    }
}

/// Nearest accepted string from `scope` next to `probes` in the given direction.
///
/// The answer is returned as the number of leading query symbols it shares with the
/// query plus the labels that follow them.
pub(crate) fn neighbor(
    storage: &Storage,
    scope: NodeId,
    probes: &[Probe],
    direction: Direction,
    inclusive: bool,
) -> Option<(usize, Vec<u32>)> {
    let mut path = Vec::with_capacity(probes.len() + 1);
    path.push(scope);
    for &probe in probes.iter() {
        match storage.node(path[path.len() - 1]).child_probe(probe) {
            Some(next) => path.push(next),
            None => break,
        }
    }
    let matched = path.len() - 1;

    let start = if matched == probes.len() {
        let node = storage.node(path[matched]);
        if inclusive && node.is_accepting() {
            return Some((matched, Vec::new()));
        }
        if direction == Direction::Forward {
            if let Some((label, child)) = node.first_edge() {
                let mut tail = vec![label];
                tail.extend(extreme(storage, child, Direction::Forward)?);
                return Some((matched, tail));
            }
        }
        matched.checked_sub(1)?
    } else {
        matched
    };

    // Backtrack towards the scope, looking for the nearest sibling branch.
    for depth in (0..=start).rev() {
        let node = storage.node(path[depth]);
        match direction {
            Direction::Forward => {
                if let Some((label, child)) = node.edge_after(probes[depth]) {
                    let mut tail = vec![label];
                    tail.extend(extreme(storage, child, Direction::Forward)?);
                    return Some((depth, tail));
                }
            }
            Direction::Backward => {
                if let Some((label, child)) = node.edge_before(probes[depth]) {
                    let mut tail = vec![label];
                    tail.extend(extreme(storage, child, Direction::Backward)?);
                    return Some((depth, tail));
                }
                if node.is_accepting() {
                    return Some((depth, Vec::new()));
                }
            }
        }
    }
    None
}

fn assemble(alphabet: &Alphabet, head: &str, tail: &[u32]) -> String {
    let mut out = String::with_capacity(head.len() + tail.len());
    out.push_str(head);
    alphabet.decode_into(tail, &mut out);
    out
}

impl Dawg {
    /// Least (`Forward`) or greatest (`Backward`) stored string starting with `prefix`.
    pub(crate) fn extreme_in(&self, prefix: &str, direction: Direction) -> Option<String> {
        let storage = self.storage();
        let alphabet = self.alphabet();
        let scope = self.descend(&storage, &alphabet, prefix)?;
        let tail = extreme(&storage, scope, direction)?;
        Some(assemble(&alphabet, prefix, &tail))
    }

    /// Nearest stored string starting with `prefix` next to `key`.
    ///
    /// `key` does not have to start with `prefix`.
    pub(crate) fn neighbor_in(&self, prefix: &str, key: &str, direction: Direction, inclusive: bool) -> Option<String> {
        let rest = match key.strip_prefix(prefix) {
            Some(rest) => rest,
            // Every string starting with `prefix` lies on the same side of `key`.
            None => {
                let all_greater = key < prefix;
                return match (direction, all_greater) {
                    (Direction::Forward, true) => self.extreme_in(prefix, Direction::Forward),
                    (Direction::Backward, false) => self.extreme_in(prefix, Direction::Backward),
                    _ => None,
                };
            }
        };

        let storage = self.storage();
        let alphabet = self.alphabet();
        let scope = self.descend(&storage, &alphabet, prefix)?;
        let probes = alphabet.probe_str(rest);
        let (kept, tail) = neighbor(&storage, scope, &probes, direction, inclusive)?;

        let head_len = prefix.len() + rest.char_indices().nth(kept).map_or(rest.len(), |(i, _)| i);
        Some(assemble(&alphabet, &key[..head_len], &tail))
    }

    /// Least stored string.
    pub fn first(&self) -> Option<String> {
        self.extreme_in("", Direction::Forward)
    }

    /// Greatest stored string.
    pub fn last(&self) -> Option<String> {
        self.extreme_in("", Direction::Backward)
    }

    /// Greatest stored string strictly less than `s`.
    pub fn lower(&self, s: &str) -> Option<String> {
        self.neighbor_in("", s, Direction::Backward, false)
    }

    /// Greatest stored string less than or equal to `s`.
    pub fn floor(&self, s: &str) -> Option<String> {
        self.neighbor_in("", s, Direction::Backward, true)
    }

    /// Least stored string greater than or equal to `s`.
    pub fn ceiling(&self, s: &str) -> Option<String> {
        self.neighbor_in("", s, Direction::Forward, true)
    }

    /// Least stored string strictly greater than `s`.
    pub fn higher(&self, s: &str) -> Option<String> {
        self.neighbor_in("", s, Direction::Forward, false)
    }

    /// Remove and return the least stored string.
    pub fn poll_first(&self) -> Option<String> {
        let s = self.first()?;
        debug!("poll_first: {:?}", s);
        self.remove(&s);
        Some(s)
    }

    /// Remove and return the greatest stored string.
    pub fn poll_last(&self) -> Option<String> {
        let s = self.last()?;
        debug!("poll_last: {:?}", s);
        self.remove(&s);
        Some(s)
    }
}
