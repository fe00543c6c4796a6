//! Reference and relationship extraction.
//!
//! `references` is the regex-based simple mode, `relationships` the
//! parser-backed AST mode.

pub mod references;
pub mod relationships;

pub use references::{decode_lossy, read_source, ReferenceExtractor, ReferenceFilter};
pub use relationships::{extract_relationships, TypeCatalog, UnitRelationships};
