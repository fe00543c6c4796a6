//! Parsing of source units into type declarations.
//!
//! The relationship extractor only needs a package name and the top-level
//! type declarations with their parents, so parsers are modelled as the
//! narrow [`SourceParser`] capability. Tests drive the extractor with
//! hand-built [`ParsedUnit`]s; production uses [`JavaParser`].

pub mod java;
pub mod language;

pub use java::JavaParser;
pub use language::SourceLanguage;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::types::TypeKind;

/// Result of parsing one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Declared package, if any.
    pub package: Option<String>,
    /// Top-level type declarations in source order.
    pub types: Vec<TypeDeclaration>,
}

/// One declared type and the names it inherits from, as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    /// Parent types. Interfaces may extend several.
    pub extends: Vec<String>,
    /// Implemented interfaces.
    pub implements: Vec<String>,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extends: Vec::new(),
            implements: Vec::new(),
        }
    }

    pub fn extending<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extends.extend(parents.into_iter().map(Into::into));
        self
    }

    pub fn implementing<I, S>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implements.extend(interfaces.into_iter().map(Into::into));
        self
    }
}

/// Anything that can turn source text into a [`ParsedUnit`].
pub trait SourceParser {
    /// Parse one unit. Malformed input is an error so callers can skip the unit.
    fn parse(&mut self, text: &str) -> Result<ParsedUnit>;
}

impl<P: SourceParser + ?Sized> SourceParser for &mut P {
    fn parse(&mut self, text: &str) -> Result<ParsedUnit> {
        (**self).parse(text)
    }
}

impl<P: SourceParser + ?Sized> SourceParser for Box<P> {
    fn parse(&mut self, text: &str) -> Result<ParsedUnit> {
        (**self).parse(text)
    }
}
