//! Java parsing via tree-sitter.
//!
//! Walks the top level of a `program` node and reports the package plus each
//! class, interface, enum, record and annotation type with the names it
//! extends or implements. Trees containing syntax errors are rejected so the
//! caller skips the unit instead of recording half-parsed declarations.

use tree_sitter::{Node, Parser};

use super::language::SourceLanguage;
use super::{ParsedUnit, SourceParser, TypeDeclaration};
use crate::error::{RefGraphError, Result};
use crate::graph::types::TypeKind;

pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let language = SourceLanguage::Java;
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| RefGraphError::Grammar {
                language: language.name(),
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }
}

impl SourceParser for JavaParser {
    fn parse(&mut self, text: &str) -> Result<ParsedUnit> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| RefGraphError::parse("parser returned no tree"))?;
        let root = tree.root_node();
        let source = text.as_bytes();

        if root.has_error() {
            let message = match first_error(&root) {
                Some(node) => {
                    let pos = node.start_position();
                    format!(
                        "syntax error at line {}, column {}",
                        pos.row + 1,
                        pos.column + 1
                    )
                }
                None => "syntax error".to_string(),
            };
            return Err(RefGraphError::parse(message));
        }

        let mut unit = ParsedUnit::default();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => unit.package = package_name(&child, source),
                _ => {
                    if let Some(decl) = type_declaration(&child, source) {
                        unit.types.push(decl);
                    }
                }
            }
        }
        Ok(unit)
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'a>> = node.children(&mut cursor).collect();
    children
        .iter()
        .filter(|c| c.has_error())
        .find_map(|c| first_error(c))
}

fn package_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
    let text = found.utf8_text(source).ok()?;
    Some(text.chars().filter(|c| !c.is_whitespace()).collect())
}

fn type_declaration(node: &Node, source: &[u8]) -> Option<TypeDeclaration> {
    let kind = match node.kind() {
        "class_declaration" => TypeKind::Class,
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        "record_declaration" => TypeKind::Record,
        "annotation_type_declaration" => TypeKind::Annotation,
        _ => return None,
    };
    let name = node
        .child_by_field_name("name")?
        .utf8_text(source)
        .ok()?
        .to_string();
    let mut decl = TypeDeclaration::new(name, kind);

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            // class Foo extends Bar
            "superclass" => decl.extends.extend(type_names(&child, source)),
            // interface Foo extends Bar, Baz
            "extends_interfaces" => decl.extends.extend(type_names(&child, source)),
            // class/enum/record Foo implements Bar, Baz
            "super_interfaces" => decl.implements.extend(type_names(&child, source)),
            _ => {}
        }
    }
    Some(decl)
}

/// Names of the types listed directly under `node` (or under its `type_list`).
fn type_names(node: &Node, source: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            out.extend(type_names(&child, source));
        } else if let Some(name) = simple_type_name(&child, source) {
            out.push(name);
        }
    }
    out
}

/// Reduce a type node to its simple name: `List<Foo>` -> `List`,
/// `a.b.Foo` -> `Foo`.
fn simple_type_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "type_identifier" | "identifier" => node.utf8_text(source).ok().map(str::to_string),
        "generic_type" => {
            let mut cursor = node.walk();
            let base = node.named_children(&mut cursor).next()?;
            simple_type_name(&base, source)
        }
        "scoped_type_identifier" | "annotated_type" => {
            let mut cursor = node.walk();
            let last = node.named_children(&mut cursor).last()?;
            simple_type_name(&last, source)
        }
        _ => None,
    }
}
