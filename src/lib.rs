//! # refgraph
//!
//! Static reference graphs for Java-style source trees.
//!
//! refgraph scans a directory of source files and builds a directed graph of
//! which file or type refers to which, then renders it as an indented tree or
//! a diagram description.
//!
//! ## Two Modes
//!
//! - **Simple**: regex reference extraction; identities are root-relative
//!   file paths and edges are untyped
//! - **AST**: tree-sitter parsing; identities are fully-qualified type names
//!   and edges are EXTENDS / IMPLEMENTS, resolved lazily by name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refgraph::{analyze_references, AnalyzerConfig, TextTree};
//! use std::path::Path;
//!
//! let config = AnalyzerConfig::default();
//! let graph = analyze_references(Path::new("src"), &config).unwrap();
//!
//! // Print what Main.java pulls in, cycles marked
//! println!("{}", TextTree::new(&graph, "app/Main.java"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod parser;
pub mod query;
pub mod render;

// Re-exports for convenience
pub use config::{AnalyzerConfig, FuzzyTieBreak};
pub use error::{RefGraphError, Result};

// Graph re-exports
pub use extract::{ReferenceExtractor, ReferenceFilter, TypeCatalog};
pub use graph::{
    analyze_references, analyze_types, scan_sources, DependencyGraph, GraphStats, NameResolver,
    RelationKind, Relationship, Resolution, SourceUnit, TypeInfo, TypeKind,
};
pub use parser::{JavaParser, ParsedUnit, SourceLanguage, SourceParser, TypeDeclaration};
pub use query::{
    find_type_seed, find_unit_seed, focus_types_query, focus_units_query, stats_query, tree_query,
    FocusResponse, StatsResponse, TreeResponse,
};

// Rendering
pub use render::{
    class_view, expand_focus, focus_view, full_view, reachable_view, FocusedSubgraph, GraphView,
    RelationIndex, TextTree, TreeDirection,
};
