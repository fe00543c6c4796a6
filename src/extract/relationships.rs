//! Typed relationship extraction (AST mode).
//!
//! Turns a [`ParsedUnit`] into [`TypeInfo`] records and EXTENDS / IMPLEMENTS
//! triples, and collects them for a whole project in a [`TypeCatalog`].
//! Targets stay as written in source; they are resolved when a view is built.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::graph::resolver::NameResolver;
use crate::graph::types::{RelationKind, Relationship, TypeInfo, DEFAULT_PACKAGE};
use crate::parser::ParsedUnit;

/// Type records and relationship triples for one parsed unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitRelationships {
    pub types: Vec<TypeInfo>,
    pub relationships: Vec<Relationship>,
}

/// Extract type metadata and relationships from one parsed unit.
pub fn extract_relationships(parsed: &ParsedUnit, origin: &Path) -> UnitRelationships {
    let package = parsed.package.as_deref().unwrap_or(DEFAULT_PACKAGE);
    let mut out = UnitRelationships::default();

    for decl in &parsed.types {
        let info = TypeInfo::new(&decl.name, decl.kind, package, origin);
        for parent in &decl.extends {
            out.relationships.push(Relationship::new(
                RelationKind::Extends,
                info.full_name.clone(),
                parent.clone(),
            ));
        }
        for interface in &decl.implements {
            out.relationships.push(Relationship::new(
                RelationKind::Implements,
                info.full_name.clone(),
                interface.clone(),
            ));
        }
        out.types.push(info);
    }
    out
}

/// Every declared type and relationship of an analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeInfo>,
    relationships: Vec<Relationship>,
    /// Declared full names per origin file, in declaration order.
    #[serde(skip)]
    by_file: BTreeMap<PathBuf, Vec<String>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one parsed unit.
    ///
    /// A type whose full name was already catalogued replaces the earlier
    /// record; relationships always accumulate.
    pub fn add_unit(&mut self, parsed: &ParsedUnit, origin: &Path) {
        let extracted = extract_relationships(parsed, origin);
        for info in extracted.types {
            self.by_file
                .entry(info.origin.clone())
                .or_default()
                .push(info.full_name.clone());
            self.types.insert(info.full_name.clone(), info);
        }
        self.relationships.extend(extracted.relationships);
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeInfo> {
        self.types.get(full_name)
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.types.contains_key(full_name)
    }

    /// Types in full-name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// Relationships in extraction order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Full names, sorted.
    pub fn identities(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    /// The first type declared in `path`, if any was catalogued.
    pub fn identity_for_file(&self, path: &Path) -> Option<&str> {
        self.by_file
            .get(path)?
            .iter()
            .find(|name| self.types.get(*name).is_some_and(|t| t.origin == path))
            .map(String::as_str)
    }

    /// Origin files that contributed at least one type, sorted.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.by_file.keys().map(PathBuf::as_path)
    }

    /// Types grouped by package, both levels sorted.
    pub fn packages(&self) -> BTreeMap<&str, Vec<&TypeInfo>> {
        let mut packages: BTreeMap<&str, Vec<&TypeInfo>> = BTreeMap::new();
        for info in self.types.values() {
            packages.entry(info.package.as_str()).or_default().push(info);
        }
        packages
    }

    /// Resolver over the catalogued full names.
    pub fn resolver(&self) -> NameResolver {
        NameResolver::new(self.types.keys().cloned())
    }

    /// Package of a catalogued type.
    pub fn package_of(&self, full_name: &str) -> Option<&str> {
        self.types.get(full_name).map(|t| t.package.as_str())
    }
}
