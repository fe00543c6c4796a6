//! Query interface: seed lookup and structured responses.
//!
//! Every response carries a `found` flag. When the seed cannot be mapped to
//! a known identity, `found` is false and `hints` lists some identities the
//! caller can suggest instead.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::error::{RefGraphError, Result};
use crate::extract::TypeCatalog;
use crate::graph::builder::relative_identity;
use crate::graph::{simple_name_of, DependencyGraph, GraphStats, NameResolver};
use crate::render::{
    expand_focus, focus_view, GraphView, ResolvedCatalog, TextTree, TreeDirection,
};

// ─── Seed Lookup ────────────────────────────────────────────────

/// Map a user-supplied seed to a simple-mode identity.
///
/// Tried in order: an exact identity, a path (absolute or relative to the
/// working directory) under `root`, a path relative to `root`, and a file
/// stem shared by exactly one unit.
pub fn find_unit_seed(
    graph: &DependencyGraph,
    root: &Path,
    seed: &str,
    hint_limit: usize,
) -> Result<String> {
    if graph.contains(seed) {
        return Ok(seed.to_string());
    }

    if let Some(identity) = canonical_identity(root, Path::new(seed)) {
        if graph.contains(&identity) {
            debug!(seed, %identity, "seed matched by path");
            return Ok(identity);
        }
    }

    if let Some(identity) = normalized_identity(seed) {
        if graph.contains(&identity) {
            return Ok(identity);
        }
    }

    let stem = simple_name_of(seed);
    let mut by_stem = graph
        .identities()
        .into_iter()
        .filter(|id| simple_name_of(id) == stem);
    if let (Some(only), None) = (by_stem.next(), by_stem.next()) {
        debug!(seed, identity = only, "seed matched by file stem");
        return Ok(only.to_string());
    }

    Err(not_found(seed, graph.identities(), hint_limit))
}

/// Map a user-supplied seed to an AST-mode type identity.
///
/// Tried in order: an exact fully-qualified name, a source file (the first
/// type it declares), and a simple name declared by exactly one type.
pub fn find_type_seed(
    catalog: &TypeCatalog,
    root: &Path,
    seed: &str,
    hint_limit: usize,
) -> Result<String> {
    if catalog.contains(seed) {
        return Ok(seed.to_string());
    }

    for candidate in [PathBuf::from(seed), root.join(seed)] {
        let Ok(wanted) = candidate.canonicalize() else {
            continue;
        };
        let file = catalog
            .files()
            .find(|file| file.canonicalize().is_ok_and(|f| f == wanted));
        if let Some(identity) = file.and_then(|f| catalog.identity_for_file(f)) {
            debug!(seed, identity, "seed matched by file");
            return Ok(identity.to_string());
        }
    }

    let mut by_name = catalog.types().filter(|t| t.name == seed);
    if let (Some(only), None) = (by_name.next(), by_name.next()) {
        return Ok(only.full_name.clone());
    }

    Err(not_found(seed, catalog.identities(), hint_limit))
}

fn not_found(seed: &str, known: Vec<&str>, hint_limit: usize) -> RefGraphError {
    RefGraphError::SeedNotFound {
        seed: seed.to_string(),
        hints: known
            .into_iter()
            .take(hint_limit)
            .map(str::to_string)
            .collect(),
    }
}

/// Identity of an existing file under `root`, comparing canonical paths.
fn canonical_identity(root: &Path, path: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    relative_identity(&root, &path)
}

/// `./a//b/C.java` -> `a/b/C.java`.
fn normalized_identity(seed: &str) -> Option<String> {
    let parts: Vec<&str> = Path::new(seed)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

// ─── Responses ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TreeResponse {
    pub found: bool,
    pub seed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub direction: TreeDirection,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl TreeResponse {
    /// The rendered tree, one identity per line.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Turn a miss back into [`RefGraphError::SeedNotFound`].
    pub fn ensure_found(self) -> Result<Self> {
        if self.found {
            Ok(self)
        } else {
            Err(RefGraphError::SeedNotFound {
                seed: self.seed,
                hints: self.hints,
            })
        }
    }
}

/// Dependency tree rooted at `seed` (simple mode), or the tree of its
/// dependents for [`TreeDirection::Dependents`].
pub fn tree_query(
    graph: &DependencyGraph,
    root: &Path,
    seed: &str,
    direction: TreeDirection,
    hint_limit: usize,
) -> TreeResponse {
    match find_unit_seed(graph, root, seed, hint_limit) {
        Ok(identity) => TreeResponse {
            found: true,
            seed: seed.to_string(),
            lines: TextTree::with_direction(graph, &identity, direction).into_lines(),
            identity: Some(identity),
            direction,
            hints: Vec::new(),
        },
        Err(e) => TreeResponse {
            found: false,
            seed: seed.to_string(),
            identity: None,
            direction,
            lines: Vec::new(),
            hints: e.hints().to_vec(),
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusResponse {
    pub found: bool,
    pub seed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub round_sizes: Vec<usize>,
    pub stabilized: bool,
    pub view: GraphView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl FocusResponse {
    fn missing(seed: &str, error: &RefGraphError) -> Self {
        Self {
            found: false,
            seed: seed.to_string(),
            identity: None,
            round_sizes: Vec::new(),
            stabilized: false,
            view: GraphView::default(),
            hints: error.hints().to_vec(),
        }
    }

    /// Turn a miss back into [`RefGraphError::SeedNotFound`].
    pub fn ensure_found(self) -> Result<Self> {
        if self.found {
            Ok(self)
        } else {
            Err(RefGraphError::SeedNotFound {
                seed: self.seed,
                hints: self.hints,
            })
        }
    }
}

/// Focused class diagram around a type (AST mode).
pub fn focus_types_query(
    catalog: &TypeCatalog,
    resolver: &NameResolver,
    root: &Path,
    seed: &str,
    rounds: usize,
    hint_limit: usize,
) -> FocusResponse {
    let identity = match find_type_seed(catalog, root, seed, hint_limit) {
        Ok(identity) => identity,
        Err(e) => return FocusResponse::missing(seed, &e),
    };
    let index = ResolvedCatalog::new(catalog, resolver);
    let subgraph = expand_focus(&index, &identity, rounds);
    FocusResponse {
        found: true,
        seed: seed.to_string(),
        round_sizes: subgraph.round_sizes.clone(),
        stabilized: subgraph.stabilized,
        view: focus_view(&subgraph, Some(catalog)),
        identity: Some(identity),
        hints: Vec::new(),
    }
}

/// Focused reference diagram around a file (simple mode).
pub fn focus_units_query(
    graph: &DependencyGraph,
    root: &Path,
    seed: &str,
    rounds: usize,
    hint_limit: usize,
) -> FocusResponse {
    let identity = match find_unit_seed(graph, root, seed, hint_limit) {
        Ok(identity) => identity,
        Err(e) => return FocusResponse::missing(seed, &e),
    };
    let subgraph = expand_focus(graph, &identity, rounds);
    FocusResponse {
        found: true,
        seed: seed.to_string(),
        round_sizes: subgraph.round_sizes.clone(),
        stabilized: subgraph.stabilized,
        view: focus_view(&subgraph, None),
        identity: Some(identity),
        hints: Vec::new(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub units: usize,
    pub reference_edges: usize,
    pub isolated_units: usize,
    pub types: usize,
    pub relationships: usize,
    /// Type count per package.
    pub packages: BTreeMap<String, usize>,
}

/// Counts for both analysis modes of one project.
pub fn stats_query(graph: &DependencyGraph, catalog: &TypeCatalog) -> StatsResponse {
    let GraphStats {
        node_count,
        edge_count,
        isolated_count,
    } = graph.stats();
    StatsResponse {
        units: node_count,
        reference_edges: edge_count,
        isolated_units: isolated_count,
        types: catalog.type_count(),
        relationships: catalog.relationships().len(),
        packages: catalog
            .packages()
            .into_iter()
            .map(|(pkg, types)| (pkg.to_string(), types.len()))
            .collect(),
    }
}
