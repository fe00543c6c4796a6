//! Graph module: the structural backbone of refgraph.
//!
//! Provides the core types, the directed graph engine, name resolution
//! and directory scanning/building for both analysis modes.

pub mod builder;
pub mod engine;
pub mod resolver;
pub mod types;

pub use builder::{
    analyze_references, analyze_types, build_reference_graph, build_reference_graph_from_sources,
    build_type_catalog, scan_sources, scan_stats, ScanStats,
};
pub use engine::{DependencyGraph, GraphStats};
pub use resolver::{NameResolver, Resolution};
pub use types::{
    qualify, simple_name_of, RelationKind, Relationship, SourceUnit, TypeInfo, TypeKind,
    DEFAULT_PACKAGE,
};
