//! Graph builder: scans a directory and builds the graphs.
//!
//! Walks source files respecting .gitignore, then either runs the heuristic
//! reference extractor over each file (simple mode) or parses each file into
//! a [`TypeCatalog`] (AST mode). Work is sequential; a unit that cannot be
//! read or parsed is logged and skipped.

use ignore::WalkBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

use super::engine::DependencyGraph;
use super::types::{RelationKind, SourceUnit};
use crate::config::{AnalyzerConfig, ScanConfig};
use crate::error::{truncate_message, RefGraphError, Result};
use crate::extract::{read_source, ReferenceExtractor, ReferenceFilter, TypeCatalog};
use crate::parser::{JavaParser, SourceLanguage, SourceParser};

/// Longest error message written to the log for a skipped unit.
const MAX_LOGGED_ERROR_CHARS: usize = 100;

/// Discover all source units under `root`, sorted by identity.
pub fn scan_sources(root: &Path, config: &ScanConfig) -> Result<Vec<SourceUnit>> {
    if !root.is_dir() {
        return Err(RefGraphError::RootNotFound(root.to_path_buf()));
    }

    let mut units: Vec<SourceUnit> = walk(root, config)
        .filter(|path| has_extension(path, &config.extensions))
        .filter_map(|path| {
            let identity = relative_identity(root, &path)?;
            Some(SourceUnit::new(identity, path))
        })
        .collect();
    units.sort_by(|a, b| a.identity.cmp(&b.identity));

    info!(root = %root.display(), units = units.len(), "scanned source units");
    Ok(units)
}

/// Build the simple-mode graph, reading each unit from disk.
pub fn build_reference_graph(units: &[SourceUnit], extractor: &ReferenceExtractor) -> DependencyGraph {
    build_with(units, |unit| extractor.extract_file(&unit.path))
}

/// Build the simple-mode graph from in-memory sources.
pub fn build_reference_graph_from_sources(
    sources: &[(SourceUnit, String)],
    extractor: &ReferenceExtractor,
) -> DependencyGraph {
    let units: Vec<SourceUnit> = sources.iter().map(|(unit, _)| unit.clone()).collect();
    let texts: BTreeMap<&str, &str> = sources
        .iter()
        .map(|(unit, text)| (unit.identity.as_str(), text.as_str()))
        .collect();
    build_with(&units, |unit| {
        texts
            .get(unit.identity.as_str())
            .map(|text| extractor.extract(text))
            .unwrap_or_default()
    })
}

/// Core of simple mode: link every captured symbol to all units whose file
/// stem equals it. Same-named units in different directories all receive an
/// edge; the unit itself never does.
fn build_with<F>(units: &[SourceUnit], mut references_of: F) -> DependencyGraph
where
    F: FnMut(&SourceUnit) -> BTreeSet<String>,
{
    let mut graph = DependencyGraph::new();
    let mut by_simple_name: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for unit in units {
        graph.add_node(&unit.identity);
        by_simple_name
            .entry(unit.simple_name())
            .or_default()
            .push(unit.identity.as_str());
    }

    for unit in units {
        let references = references_of(unit);
        let mut added = 0usize;
        for symbol in &references {
            let Some(targets) = by_simple_name.get(symbol.as_str()) else {
                continue;
            };
            for target in targets {
                if *target != unit.identity
                    && graph.add_edge(&unit.identity, target, RelationKind::References)
                {
                    added += 1;
                }
            }
        }
        debug!(
            unit = %unit.identity,
            references = references.len(),
            edges = added,
            "linked unit"
        );
    }

    let stats = graph.stats();
    info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        "reference graph built"
    );
    graph
}

/// Parse every unit into a [`TypeCatalog`].
///
/// Units that cannot be read or parsed are skipped with a warning.
pub fn build_type_catalog<P: SourceParser>(units: &[SourceUnit], mut parser: P) -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    let mut skipped = 0usize;

    for unit in units {
        let text = match read_source(&unit.path) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "skipping unreadable file");
                skipped += 1;
                continue;
            }
        };
        match parser.parse(&text) {
            Ok(parsed) => {
                debug!(unit = %unit.identity, types = parsed.types.len(), "parsed unit");
                catalog.add_unit(&parsed, &unit.path);
            }
            Err(e) => {
                let e = e.with_path(&unit.path);
                warn!(
                    error = %truncate_message(&e.to_string(), MAX_LOGGED_ERROR_CHARS),
                    "skipping unit"
                );
                skipped += 1;
            }
        }
    }

    info!(
        types = catalog.type_count(),
        relationships = catalog.relationships().len(),
        skipped,
        "type catalog built"
    );
    catalog
}

/// Scan `root` and build the simple-mode graph using `config`.
pub fn analyze_references(root: &Path, config: &AnalyzerConfig) -> Result<DependencyGraph> {
    let units = scan_sources(root, &config.scan)?;
    let extractor = ReferenceExtractor::with_filter(ReferenceFilter::from_config(&config.references))?;
    Ok(build_reference_graph(&units, &extractor))
}

/// Scan `root` and build the AST-mode catalog with the Java parser.
///
/// Units in a language without a parser are left out.
pub fn analyze_types(root: &Path, config: &AnalyzerConfig) -> Result<TypeCatalog> {
    let units: Vec<SourceUnit> = scan_sources(root, &config.scan)?
        .into_iter()
        .filter(|unit| match SourceLanguage::require(&unit.path) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "no parser for unit");
                false
            }
        })
        .collect();
    let parser = JavaParser::new()?;
    Ok(build_type_catalog(&units, parser))
}

/// Count what would be analyzed under `root`, per extension.
pub fn scan_stats(root: &Path, config: &ScanConfig) -> ScanStats {
    let mut stats = ScanStats::default();
    for path in walk(root, config) {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if config.extensions.iter().any(|e| e == ext) {
            stats.total_files += 1;
            *stats.by_extension.entry(ext.to_string()).or_default() += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScanStats {
    pub total_files: usize,
    pub by_extension: BTreeMap<String, usize>,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Found {} source files", self.total_files)?;
        if !self.by_extension.is_empty() {
            let parts: Vec<String> = self
                .by_extension
                .iter()
                .map(|(ext, n)| format!(".{}: {}", ext, n))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

// ─── Internal Helpers ───────────────────────────────────────────

fn walk<'a>(root: &Path, config: &'a ScanConfig) -> impl Iterator<Item = std::path::PathBuf> + 'a {
    let respect = config.respect_gitignore;
    WalkBuilder::new(root)
        .hidden(!config.include_hidden)
        .git_ignore(respect)
        .git_global(respect)
        .git_exclude(respect)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// `root`-relative, `/`-separated identity for `path`.
pub fn relative_identity(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::TypeKind;
    use crate::parser::{ParsedUnit, TypeDeclaration};
    use std::fs;

    fn source(identity: &str, text: &str) -> (SourceUnit, String) {
        (SourceUnit::new(identity, identity), text.to_string())
    }

    fn adjacency(graph: &DependencyGraph) -> Vec<(String, Vec<String>)> {
        graph
            .to_adjacency()
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().collect()))
            .collect()
    }

    #[test]
    fn test_example_graph() {
        let extractor = ReferenceExtractor::new().unwrap();
        let graph = build_reference_graph_from_sources(
            &[
                source("A.java", "class A extends B {}"),
                source("B.java", "class B {}"),
                source("C.java", "class C implements A {}"),
            ],
            &extractor,
        );
        assert_eq!(
            adjacency(&graph),
            vec![
                ("A.java".to_string(), vec!["B.java".to_string()]),
                ("B.java".to_string(), vec![]),
                ("C.java".to_string(), vec!["A.java".to_string()]),
            ]
        );
    }

    #[test]
    fn test_self_reference_suppressed() {
        let extractor = ReferenceExtractor::new().unwrap();
        let graph = build_reference_graph_from_sources(
            &[source("X.java", "class X extends X { X x = new X(); }")],
            &extractor,
        );
        assert_eq!(adjacency(&graph), vec![("X.java".to_string(), vec![])]);
        assert_eq!(graph.stats().edge_count, 0);
    }

    #[test]
    fn test_same_simple_name_in_two_packages_both_linked() {
        let extractor = ReferenceExtractor::new().unwrap();
        let graph = build_reference_graph_from_sources(
            &[
                source("app/Main.java", "class Main { void run() { Util.go(); } }"),
                source("a/Util.java", "class Util {}"),
                source("b/Util.java", "class Util {}"),
            ],
            &extractor,
        );
        assert_eq!(
            graph.dependencies("app/Main.java"),
            vec!["a/Util.java", "b/Util.java"]
        );
        assert!(graph.dependencies("a/Util.java").is_empty());
    }

    #[test]
    fn test_unresolved_references_dropped() {
        let extractor = ReferenceExtractor::new().unwrap();
        let graph = build_reference_graph_from_sources(
            &[source("A.java", "class A extends Thread { List l = new ArrayList(); }")],
            &extractor,
        );
        assert_eq!(graph.stats().edge_count, 0);
        assert_eq!(graph.stats().node_count, 1);
    }

    #[test]
    fn test_scan_sources_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pkg/sub")).unwrap();
        fs::write(root.join("pkg/sub/Z.java"), "class Z {}").unwrap();
        fs::write(root.join("pkg/A.java"), "class A {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();

        let units = scan_sources(root, &ScanConfig::default()).unwrap();
        let ids: Vec<&str> = units.iter().map(|u| u.identity.as_str()).collect();
        assert_eq!(ids, vec!["pkg/A.java", "pkg/sub/Z.java"]);
        assert_eq!(units[0].path, root.join("pkg/A.java"));

        let stats = scan_stats(root, &ScanConfig::default());
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.to_string(), "Found 2 source files (.java: 2)");
    }

    #[test]
    fn test_scan_missing_root() {
        let err = scan_sources(Path::new("/no/such/root/anywhere"), &ScanConfig::default())
            .unwrap_err();
        assert!(matches!(err, RefGraphError::RootNotFound(_)));
    }

    #[test]
    fn test_build_reference_graph_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("A.java"), "class A extends B {}").unwrap();
        fs::write(root.join("B.java"), b"class B { /* \xFF\xFE */ }").unwrap();

        let units = scan_sources(root, &ScanConfig::default()).unwrap();
        let graph = build_reference_graph(&units, &ReferenceExtractor::new().unwrap());
        assert_eq!(graph.dependencies("A.java"), vec!["B.java"]);
    }

    struct FakeParser;

    impl SourceParser for FakeParser {
        fn parse(&mut self, text: &str) -> Result<ParsedUnit> {
            match text.trim() {
                "broken" => Err(RefGraphError::parse("unexpected token")),
                name => Ok(ParsedUnit {
                    package: Some("fake".to_string()),
                    types: vec![TypeDeclaration::new(name, TypeKind::Class).extending(["Base"])],
                }),
            }
        }
    }

    #[test]
    fn test_build_type_catalog_skips_bad_units() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Good.java"), "Good").unwrap();
        fs::write(root.join("Bad.java"), "broken").unwrap();

        let mut units = scan_sources(root, &ScanConfig::default()).unwrap();
        units.push(SourceUnit::new("Gone.java", root.join("Gone.java")));

        let catalog = build_type_catalog(&units, FakeParser);
        assert_eq!(catalog.identities(), vec!["fake.Good"]);
        assert_eq!(catalog.relationships().len(), 1);
        assert_eq!(
            catalog.identity_for_file(&root.join("Good.java")),
            Some("fake.Good")
        );
    }

    #[test]
    fn test_analyze_types_skips_unparseable_languages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("Main.java"), "package app; class Main extends Base {}").unwrap();
        fs::write(root.join("Base.kt"), "open class Base").unwrap();

        let mut config = AnalyzerConfig::default();
        config.scan.extensions = vec!["java".to_string(), "kt".to_string()];
        let catalog = analyze_types(root, &config).unwrap();
        assert_eq!(catalog.identities(), vec!["app.Main"]);

        let graph = analyze_references(root, &config).unwrap();
        assert_eq!(graph.dependencies("Main.java"), vec!["Base.kt"]);
    }

    #[test]
    fn test_relative_identity() {
        assert_eq!(
            relative_identity(Path::new("/r"), Path::new("/r/a/B.java")).as_deref(),
            Some("a/B.java")
        );
        assert_eq!(relative_identity(Path::new("/r"), Path::new("/x/B.java")), None);
        assert_eq!(relative_identity(Path::new("/r"), Path::new("/r")), None);
    }
}
