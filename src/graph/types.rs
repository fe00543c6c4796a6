//! Core types for the relationship graph.
//!
//! Defines source units, declared types, relationship kinds and the
//! relationship triples produced by the extractors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Package name used when a unit declares no package.
pub const DEFAULT_PACKAGE: &str = "default";

/// One discovered source file.
///
/// The text is not retained; builders read it on demand and drop it once
/// references have been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Path relative to the scan root, `/`-separated.
    pub identity: String,
    /// Where the file lives on disk.
    pub path: PathBuf,
}

impl SourceUnit {
    pub fn new(identity: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            identity: identity.into(),
            path: path.into(),
        }
    }

    /// File stem of the identity (`com/acme/Foo.java` -> `Foo`).
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.identity)
    }
}

/// File stem of a `/`-separated identity.
pub fn simple_name_of(identity: &str) -> &str {
    let file = identity.rsplit('/').next().unwrap_or(identity);
    match file.rfind('.') {
        Some(0) | None => file,
        Some(dot) => &file[..dot],
    }
}

/// What kind of type declaration a `TypeInfo` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    /// An `@interface` annotation type.
    Annotation,
}

impl TypeKind {
    pub fn is_interface(&self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Annotation)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Record => write!(f, "record"),
            TypeKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// Metadata for one declared type (AST mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Simple name, e.g. `UserService`.
    pub name: String,
    /// `package.Name`.
    pub full_name: String,
    pub kind: TypeKind,
    /// Declared package, or [`DEFAULT_PACKAGE`].
    pub package: String,
    /// File the type was declared in.
    pub origin: PathBuf,
}

impl TypeInfo {
    pub fn new(name: &str, kind: TypeKind, package: &str, origin: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            full_name: qualify(package, name),
            kind,
            package: package.to_string(),
            origin: origin.into(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }
}

/// Join a package and a simple name.
pub fn qualify(package: &str, name: &str) -> String {
    format!("{}.{}", package, name)
}

/// The kind of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    /// Declaring type extends the target (class or interface parent).
    Extends,
    /// Declaring type implements the target interface.
    Implements,
    /// Untyped reference found by heuristic extraction.
    References,
}

impl RelationKind {
    /// Stable tag handed to diagram renderers.
    pub fn tag(&self) -> &'static str {
        match self {
            RelationKind::Extends => "EXTENDS",
            RelationKind::Implements => "IMPLEMENTS",
            RelationKind::References => "REFERENCES",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A typed relationship triple. `to` is the name as written in source and is
/// resolved lazily against the known types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationKind,
    /// Fully-qualified name of the declaring type.
    pub from: String,
    /// Unresolved target name.
    pub to: String,
}

impl Relationship {
    pub fn new(kind: RelationKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name_of("com/acme/Foo.java"), "Foo");
        assert_eq!(simple_name_of("Foo.java"), "Foo");
        assert_eq!(simple_name_of("Makefile"), "Makefile");
        assert_eq!(simple_name_of("a/b.c/Bar.Baz.java"), "Bar.Baz");
        assert_eq!(simple_name_of(".hidden"), ".hidden");
        let unit = SourceUnit::new("app/model/Agent.java", "/tmp/app/model/Agent.java");
        assert_eq!(unit.simple_name(), "Agent");
    }

    #[test]
    fn test_type_info_full_name() {
        let info = TypeInfo::new("Engine", TypeKind::Class, "simu.framework", "Engine.java");
        assert_eq!(info.full_name, "simu.framework.Engine");
        assert!(!info.is_interface());

        let info = TypeInfo::new("Agent", TypeKind::Interface, DEFAULT_PACKAGE, "Agent.java");
        assert_eq!(info.full_name, "default.Agent");
        assert!(info.is_interface());
        assert!(TypeKind::Annotation.is_interface());
        assert!(!TypeKind::Enum.is_interface());
    }

    #[test]
    fn test_relation_kind_tags() {
        assert_eq!(RelationKind::Extends.to_string(), "EXTENDS");
        assert_eq!(RelationKind::Implements.tag(), "IMPLEMENTS");
        assert_eq!(
            serde_json::to_string(&RelationKind::References).unwrap(),
            "\"REFERENCES\""
        );
    }
}
