//! Indented dependency tree.
//!
//! ```text
//! C.java
//! └── A.java
//!     └── B.java
//! ```
//!
//! [`TextTree::reverse`] walks the other way, from a unit to whatever
//! references it.
//!
//! The visited set spans the whole traversal, not a single branch: an
//! identity is expanded once, and every later occurrence is printed as a
//! leaf marked `(cyclic reference)`. That keeps output finite on cyclic
//! graphs and also collapses shared subtrees (diamonds) after first sight.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::graph::DependencyGraph;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";
const CYCLIC_MARKER: &str = " (cyclic reference)";

/// One rendered line of a [`TextTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLine {
    pub identity: String,
    /// 0 for the root.
    pub depth: usize,
    /// Already expanded elsewhere in this traversal.
    pub cyclic: bool,
    /// Full line including prefix and connector.
    pub text: String,
}

/// Which neighbors a [`TextTree`] expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeDirection {
    /// What each unit references.
    #[default]
    Dependencies,
    /// What references each unit.
    Dependents,
}

struct Pending {
    identity: String,
    depth: usize,
    /// Prefix inherited from ancestors.
    prefix: String,
    is_last: bool,
}

/// Lazy depth-first tree over a [`DependencyGraph`].
///
/// Yields one [`TreeLine`] per step from an explicit stack, so deep graphs
/// never recurse on the call stack.
pub struct TextTree<'a> {
    graph: &'a DependencyGraph,
    root: String,
    direction: TreeDirection,
    stack: Vec<Pending>,
    visited: HashSet<String>,
}

impl<'a> TextTree<'a> {
    pub fn new(graph: &'a DependencyGraph, root: &str) -> Self {
        Self::with_direction(graph, root, TreeDirection::Dependencies)
    }

    /// Tree of everything that references `root`, transitively.
    pub fn reverse(graph: &'a DependencyGraph, root: &str) -> Self {
        Self::with_direction(graph, root, TreeDirection::Dependents)
    }

    pub fn with_direction(graph: &'a DependencyGraph, root: &str, direction: TreeDirection) -> Self {
        Self {
            graph,
            root: root.to_string(),
            direction,
            stack: vec![Pending {
                identity: root.to_string(),
                depth: 0,
                prefix: String::new(),
                is_last: true,
            }],
            visited: HashSet::new(),
        }
    }

    /// Collect the remaining lines as plain strings.
    pub fn into_lines(self) -> Vec<String> {
        self.map(|line| line.text).collect()
    }
}

impl Iterator for TextTree<'_> {
    type Item = TreeLine;

    fn next(&mut self) -> Option<TreeLine> {
        let Pending {
            identity,
            depth,
            prefix,
            is_last,
        } = self.stack.pop()?;

        let connector = match (depth, is_last) {
            (0, _) => "",
            (_, true) => LAST_BRANCH,
            (_, false) => BRANCH,
        };

        if !self.visited.insert(identity.clone()) {
            return Some(TreeLine {
                text: format!("{}{}{}{}", prefix, connector, identity, CYCLIC_MARKER),
                identity,
                depth,
                cyclic: true,
            });
        }

        let child_prefix = match (depth, is_last) {
            (0, _) => String::new(),
            (_, true) => format!("{}{}", prefix, SPACE),
            (_, false) => format!("{}{}", prefix, PIPE),
        };
        let children = match self.direction {
            TreeDirection::Dependencies => self.graph.dependencies(&identity),
            TreeDirection::Dependents => self.graph.dependents(&identity),
        };
        let count = children.len();
        // Reverse so the lexicographically first child is popped first.
        for (i, child) in children.into_iter().enumerate().rev() {
            self.stack.push(Pending {
                identity: child.to_string(),
                depth: depth + 1,
                prefix: child_prefix.clone(),
                is_last: i + 1 == count,
            });
        }

        Some(TreeLine {
            text: format!("{}{}{}", prefix, connector, identity),
            identity,
            depth,
            cyclic: false,
        })
    }
}

impl fmt::Display for TextTree<'_> {
    /// Renders a fresh traversal; the iterator state is left untouched.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = TextTree::with_direction(self.graph, &self.root, self.direction).into_lines();
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RelationKind;

    fn graph(edges: &[(&str, &str)], nodes: &[&str]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for n in nodes {
            g.add_node(n);
        }
        for (a, b) in edges {
            g.add_node(a);
            g.add_node(b);
            g.add_edge(a, b, RelationKind::References);
        }
        g
    }

    #[test]
    fn test_chain() {
        let g = graph(&[("A", "B"), ("C", "A")], &[]);
        assert_eq!(
            TextTree::new(&g, "C").to_string(),
            "C\n└── A\n    └── B"
        );
    }

    #[test]
    fn test_siblings_sorted_with_connectors() {
        let g = graph(&[("R", "b"), ("R", "a"), ("a", "x"), ("R", "c")], &[]);
        let lines = TextTree::new(&g, "R").into_lines();
        assert_eq!(
            lines,
            vec!["R", "├── a", "│   └── x", "├── b", "└── c"]
        );
    }

    #[test]
    fn test_cycle_terminates_and_is_marked() {
        let g = graph(&[("A", "B"), ("B", "A")], &[]);
        let lines: Vec<TreeLine> = TextTree::new(&g, "A").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].text, "    └── A (cyclic reference)");
        assert!(lines[2].cyclic);
        assert_eq!(lines[2].depth, 2);
    }

    #[test]
    fn test_shared_subtree_expanded_once() {
        let g = graph(&[("R", "L"), ("R", "M"), ("L", "S"), ("M", "S"), ("S", "T")], &[]);
        let lines = TextTree::new(&g, "R").into_lines();
        assert_eq!(
            lines,
            vec![
                "R",
                "├── L",
                "│   └── S",
                "│       └── T",
                "└── M",
                "    └── S (cyclic reference)",
            ]
        );
    }

    #[test]
    fn test_each_identity_expanded_at_most_once() {
        let g = graph(
            &[("A", "B"), ("B", "C"), ("C", "A"), ("A", "C"), ("C", "B")],
            &[],
        );
        let lines: Vec<TreeLine> = TextTree::new(&g, "A").collect();
        let expanded: Vec<&str> = lines
            .iter()
            .filter(|l| !l.cyclic)
            .map(|l| l.identity.as_str())
            .collect();
        assert_eq!(expanded, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_reverse_lists_referencing_units() {
        let g = graph(&[("A", "B"), ("C", "A"), ("D", "B"), ("B", "E")], &[]);
        assert_eq!(
            TextTree::reverse(&g, "B").into_lines(),
            vec!["B", "├── A", "│   └── C", "└── D"]
        );
        // Nothing references the top of the chain.
        assert_eq!(TextTree::reverse(&g, "C").to_string(), "C");
    }

    #[test]
    fn test_reverse_cycle_is_marked() {
        let g = graph(&[("A", "B"), ("B", "A")], &[]);
        let tree = TextTree::reverse(&g, "A");
        assert_eq!(tree.to_string(), "A\n└── B\n    └── A (cyclic reference)");
    }

    #[test]
    fn test_leaf_root_and_repeat_display() {
        let g = graph(&[], &["Solo"]);
        let tree = TextTree::new(&g, "Solo");
        assert_eq!(tree.to_string(), "Solo");
        // Display does not consume or share traversal state.
        assert_eq!(tree.to_string(), "Solo");
        assert_eq!(tree.count(), 1);
    }
}
