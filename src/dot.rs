//! DAWG to DOT (Graphviz) conversion.
//!
//! The generated graph follows these conventions:
//! - **States** are circles, accepting states are double circles,
//! - **Transitions** are arrows labelled with their symbol; parallel transitions
//!   between the same two states are merged into one arrow by default,
//! - **Start** is an unlabelled point pointing at the root.
//!
//! ```
//! use dawg_rs::dawg::Dawg;
//!
//! let dawg = Dawg::from_strings(["tap", "top"]).unwrap();
//! let dot = dawg.to_dot().unwrap();
//! assert!(dot.contains("label=\"a,o\""));
//! // Render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::dawg::Dawg;
use crate::reference::NodeId;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for non-accepting states (default: "circle")
    pub node_shape: &'static str,
    /// Shape for accepting states (default: "doublecircle")
    pub accept_shape: &'static str,
    /// Graph direction (default: "LR")
    pub rankdir: &'static str,
    /// Label states with their node ids instead of leaving them blank (default: true)
    pub show_ids: bool,
    /// Merge parallel transitions into one arrow (default: true)
    pub merge_edges: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            accept_shape: "doublecircle",
            rankdir: "LR",
            show_ids: true,
            merge_edges: true,
        }
    }
}

fn escape(symbol: char, out: &mut String) {
    match symbol {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        c if c.is_control() => out.extend(c.escape_unicode()),
        c => out.push(c),
    }
}

impl Dawg {
    /// Converts the automaton to DOT format.
    ///
    /// Only states reachable from the root are rendered.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the automaton to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let nodes: BTreeSet<NodeId> = self.reachable();

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "rankdir={};", config.rankdir)?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        writeln!(dot, "{{ rank=source")?;
        writeln!(dot, "start [shape=point];")?;
        writeln!(dot, "}}")?;

        for &id in nodes.iter() {
            let label = if config.show_ids { id.get().to_string() } else { String::new() };
            if self.is_accepting(id) {
                writeln!(dot, "{} [shape={}, label=\"{}\"];", id.get(), config.accept_shape, label)?;
            } else {
                writeln!(dot, "{} [label=\"{}\"];", id.get(), label)?;
            }
        }

        writeln!(dot, "start -> {};", self.root().get())?;

        for &id in nodes.iter() {
            let children = self.children(id);
            if config.merge_edges {
                // Children in first-symbol order, each with all of its symbols.
                let mut grouped = BTreeMap::<NodeId, String>::new();
                let mut order = Vec::new();
                for (symbol, child) in children {
                    let label = grouped.entry(child).or_insert_with(|| {
                        order.push(child);
                        String::new()
                    });
                    if !label.is_empty() {
                        label.push(',');
                    }
                    escape(symbol, label);
                }
                for child in order {
                    writeln!(dot, "{} -> {} [label=\"{}\"];", id.get(), child.get(), grouped[&child])?;
                }
            } else {
                for (symbol, child) in children {
                    let mut label = String::new();
                    escape(symbol, &mut label);
                    writeln!(dot, "{} -> {} [label=\"{}\"];", id.get(), child.get(), label)?;
                }
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dot_basic() {
        let dawg = Dawg::from_strings(["cat", "car"]).unwrap();
        let dot = dawg.to_dot().unwrap();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("shape=doublecircle"));
        assert!(dot.contains(&format!("start -> {};", dawg.root().get())));
        // "car" and "cat" end in the same state, so the transitions are merged.
        assert!(dot.contains("label=\"r,t\""));
        assert_eq!(dot.matches(" -> ").count(), 1 + 3);
    }

    #[test]
    fn test_to_dot_empty() {
        let dawg = Dawg::default();
        let dot = dawg.to_dot().unwrap();
        assert!(dot.starts_with("digraph {"));
        assert_eq!(dot.matches(" -> ").count(), 1);
        assert!(!dot.contains("shape=doublecircle"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let dawg = Dawg::from_strings(["cat", "car"]).unwrap();
        let config = DotConfig {
            merge_edges: false,
            show_ids: false,
            ..DotConfig::default()
        };
        let dot = dawg.to_dot_with_config(&config).unwrap();
        assert!(dot.contains("[label=\"r\"]"));
        assert!(dot.contains("[label=\"t\"]"));
        assert_eq!(dot.matches(" -> ").count(), 1 + 4);
    }

    #[test]
    fn test_escaping() {
        let dawg = Dawg::from_strings(["\"", "\\"]).unwrap();
        let dot = dawg.to_dot().unwrap();
        assert!(dot.contains(r#"label="\",\\""#));
    }

    /// Helper test to write DOT file for manual inspection (disabled by default)
    #[test]
    #[ignore]
    fn test_write_dot_file() {
        let dawg = Dawg::from_strings(["tap", "taps", "top", "tops", "stop", "stops"]).unwrap();
        let dot = dawg.to_dot().unwrap();
        std::fs::write("test_output.dot", &dot).unwrap();
        println!("DOT output:\n{}", dot);
    }
}
