//! Diagram descriptions: nodes plus kind-tagged edges.
//!
//! A [`GraphView`] is what gets handed to an external renderer, either as
//! Graphviz DOT text or as JSON. Edges may dangle: a target that was never
//! analyzed still gets a synthetic node so renderers have something to draw.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write as _;

use super::focus::FocusedSubgraph;
use crate::extract::TypeCatalog;
use crate::graph::{DependencyGraph, NameResolver, RelationKind, TypeInfo, TypeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// `None` for files and for unresolved targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeKind>,
    pub is_seed: bool,
}

impl ViewNode {
    fn plain(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            package: None,
            kind: None,
            is_seed: false,
        }
    }

    fn for_type(info: &TypeInfo) -> Self {
        let label = if info.is_interface() {
            format!("«interface»\n{}", info.name)
        } else {
            info.name.clone()
        };
        Self {
            id: info.full_name.clone(),
            label,
            package: Some(info.package.clone()),
            kind: Some(info.kind),
            is_seed: false,
        }
    }

    fn is_interface(&self) -> bool {
        self.kind.is_some_and(|k| k.is_interface())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ViewEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

impl GraphView {
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn seed(&self) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.is_seed)
    }

    // ─── Output ─────────────────────────────────────────────────────

    /// Graphviz DOT text.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph refgraph {\n");
        out.push_str("    rankdir=BT;\n");
        out.push_str("    node [fontname=\"Helvetica\", fontsize=10];\n");
        out.push_str("    edge [fontname=\"Helvetica\", fontsize=8];\n");

        let mut packages: BTreeMap<&str, Vec<&ViewNode>> = BTreeMap::new();
        let mut loose: Vec<&ViewNode> = Vec::new();
        for node in &self.nodes {
            match node.package.as_deref() {
                Some(pkg) => packages.entry(pkg).or_default().push(node),
                None => loose.push(node),
            }
        }

        for (pkg, nodes) in &packages {
            let _ = writeln!(out, "\n    subgraph {} {{", quote(&format!("cluster_{}", pkg)));
            let _ = writeln!(out, "        label={};", quote(pkg));
            out.push_str("        style=rounded;\n");
            for node in nodes {
                let _ = writeln!(out, "        {}", dot_node(node));
            }
            out.push_str("    }\n");
        }
        if !loose.is_empty() {
            out.push('\n');
            for node in loose {
                let _ = writeln!(out, "    {}", dot_node(node));
            }
        }

        if !self.edges.is_empty() {
            out.push('\n');
        }
        for edge in &self.edges {
            let style = match edge.kind {
                RelationKind::Extends => {
                    "label=\"extends\", arrowhead=onormal, color=red, style=bold"
                }
                RelationKind::Implements => {
                    "label=\"implements\", arrowhead=onormal, color=blue, style=dashed"
                }
                RelationKind::References => "arrowhead=vee",
            };
            let _ = writeln!(
                out,
                "    {} -> {} [{}];",
                quote(&edge.from),
                quote(&edge.to),
                style
            );
        }
        out.push_str("}\n");
        out
    }

    /// Plain adjacency listing, one `from -> to` line per edge.
    pub fn to_text(&self) -> String {
        let mut targets: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for edge in &self.edges {
            targets
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&node.id);
            out.push('\n');
            for to in targets.get(node.id.as_str()).into_iter().flatten() {
                let _ = writeln!(out, "    -> {}", to);
            }
        }
        out
    }
}

fn dot_node(node: &ViewNode) -> String {
    let record = !node.is_interface();
    let shape = if record { "record" } else { "component" };
    let mut attrs = format!("label=\"{}\", shape={}", escape(&node.label, record), shape);
    if node.is_seed {
        attrs.push_str(", style=filled, fillcolor=lightcoral");
    }
    format!("{} [{}];", quote(&node.id), attrs)
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s, false))
}

/// Escape text for a DOT quoted string. Record labels also treat
/// `{ } | < >` as field syntax.
fn escape(s: &str, record: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '{' | '}' | '|' | '<' | '>' if record => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

// ─── Views ──────────────────────────────────────────────────────

/// Everything reachable from `seed`.
///
/// A node is registered before its dependencies are expanded, so revisits
/// only add the edge and never recurse.
pub fn reachable_view(graph: &DependencyGraph, seed: &str) -> GraphView {
    let mut view = GraphView::default();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = vec![seed];

    visited.insert(seed);
    view.nodes.push(ViewNode {
        is_seed: true,
        ..ViewNode::plain(seed)
    });

    while let Some(current) = stack.pop() {
        let mut fresh = Vec::new();
        for dep in graph.dependencies(current) {
            view.edges.push(ViewEdge {
                from: current.to_string(),
                to: dep.to_string(),
                kind: RelationKind::References,
            });
            if visited.insert(dep) {
                view.nodes.push(ViewNode::plain(dep));
                fresh.push(dep);
            }
        }
        stack.extend(fresh.into_iter().rev());
    }
    view.edges.sort();
    view
}

/// Every unit and every edge.
pub fn full_view(graph: &DependencyGraph) -> GraphView {
    GraphView {
        nodes: graph.identities().into_iter().map(ViewNode::plain).collect(),
        edges: graph
            .edges()
            .into_iter()
            .map(|(from, to, kind)| ViewEdge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
            })
            .collect(),
    }
}

/// Global class diagram.
///
/// Targets are resolved with the package of the declaring type.
/// Relationships whose source is not catalogued are skipped.
pub fn class_view(catalog: &TypeCatalog, resolver: &NameResolver) -> GraphView {
    let mut view = GraphView {
        nodes: catalog.types().map(ViewNode::for_type).collect(),
        edges: Vec::new(),
    };

    let mut synthetic: BTreeSet<String> = BTreeSet::new();
    let mut seen: HashSet<ViewEdge> = HashSet::new();
    for rel in catalog.relationships() {
        let Some(package) = catalog.package_of(&rel.from) else {
            continue;
        };
        let resolution = resolver.resolve(&rel.to, package);
        // A resolver may know identities outside this catalog.
        if !resolution.is_resolved() || !catalog.contains(resolution.identity()) {
            synthetic.insert(resolution.identity().to_string());
        }
        let target = resolution.into_identity();
        let edge = ViewEdge {
            from: rel.from.clone(),
            to: target,
            kind: rel.kind,
        };
        if seen.insert(edge.clone()) {
            view.edges.push(edge);
        }
    }
    view.nodes.extend(synthetic.iter().map(|id| ViewNode::plain(id)));
    view
}

/// Focused subgraph, seed flagged. Members found in `catalog` carry their
/// type metadata; everything else is drawn as a plain node.
pub fn focus_view(subgraph: &FocusedSubgraph, catalog: Option<&TypeCatalog>) -> GraphView {
    let nodes = subgraph
        .members
        .iter()
        .map(|id| {
            let node = catalog
                .and_then(|c| c.get(id))
                .map(ViewNode::for_type)
                .unwrap_or_else(|| ViewNode::plain(id));
            ViewNode {
                is_seed: *id == subgraph.seed,
                ..node
            }
        })
        .collect();
    let edges = subgraph
        .edges
        .iter()
        .map(|e| ViewEdge {
            from: e.from.clone(),
            to: e.to.clone(),
            kind: e.kind,
        })
        .collect();
    GraphView { nodes, edges }
}
