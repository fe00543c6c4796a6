//! Heuristic reference extraction (simple mode).
//!
//! Two stages kept apart on purpose:
//!
//! 1. [`ReferenceExtractor::candidates`] strips comments and runs a fixed list
//!    of regex pattern classes, returning every captured token.
//! 2. [`ReferenceFilter::retain`] drops tokens that do not look like type
//!    names or are on the exclusion list.
//!
//! The patterns are approximate. They will pick up receivers that are really
//! constants or packages and will miss types only used in declarations; the
//! graph builder only keeps tokens that match a known unit anyway.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

use crate::config::ReferenceConfig;
use crate::error::{RefGraphError, Result};

/// A pattern class and which capture groups hold reference tokens.
struct PatternClass {
    regex: Regex,
    groups: &'static [usize],
}

/// Ordered pattern list. Groups listed are split on commas before trimming.
const PATTERNS: &[(&str, &[usize])] = &[
    // class X extends Y
    (r"class\s+(\w+)\s+extends\s+(\w+)", &[1, 2]),
    // class X implements Y1, Y2
    (r"class\s+(\w+)\s+implements\s+([\w\s,]+)", &[1, 2]),
    // bare extends / implements
    (r"extends\s+(\w+)", &[1]),
    (r"implements\s+([\w\s,]+)", &[1]),
    // new Foo(
    (r"new\s+(\w+)\s*\(", &[1]),
    // Foo.class
    (r"(\w+)\.class", &[1]),
    // @Annotation
    (r"@(\w+)", &[1]),
    // import a.b.C;
    (r"import\s+([\w\.]+);", &[1]),
    // receiver.method(
    (r"(\w+)\.\w+\s*\(", &[1]),
    // receiver.member followed by a boundary; group 2 is the boundary itself
    (r"(\w+)\.\w+(\s|;|\)|,|\]|\[)", &[1]),
];

/// Compiled candidate patterns plus the filter applied to their output.
pub struct ReferenceExtractor {
    block_comment: Regex,
    line_comment: Regex,
    patterns: Vec<PatternClass>,
    filter: ReferenceFilter,
}

impl ReferenceExtractor {
    /// Build an extractor with the default filter.
    pub fn new() -> Result<Self> {
        Self::with_filter(ReferenceFilter::default())
    }

    pub fn with_filter(filter: ReferenceFilter) -> Result<Self> {
        let patterns = PATTERNS
            .iter()
            .map(|(pattern, groups)| {
                Ok(PatternClass {
                    regex: Regex::new(pattern)?,
                    groups,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            block_comment: Regex::new(r"(?s)/\*.*?\*/")?,
            line_comment: Regex::new(r"//[^\n]*")?,
            patterns,
            filter,
        })
    }

    pub fn filter(&self) -> &ReferenceFilter {
        &self.filter
    }

    /// Referenced type names in `text`, filtered.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        self.filter.retain(self.candidates(text))
    }

    /// Read `path` and extract its references.
    ///
    /// Never fails: an unreadable file is logged and contributes nothing.
    pub fn extract_file(&self, path: &Path) -> BTreeSet<String> {
        match read_source(path) {
            Ok(text) => self.extract(&text),
            Err(e) => {
                warn!(error = %e, "skipping unreadable file");
                BTreeSet::new()
            }
        }
    }

    /// Every token captured by the pattern classes, unfiltered.
    pub fn candidates(&self, text: &str) -> BTreeSet<String> {
        let cleaned = self.strip_comments(text);
        let mut found = BTreeSet::new();
        for class in &self.patterns {
            for caps in class.regex.captures_iter(&cleaned) {
                for &group in class.groups {
                    let Some(m) = caps.get(group) else {
                        continue;
                    };
                    for token in m.as_str().split(',') {
                        let token = token.trim();
                        if !token.is_empty() {
                            found.insert(token.to_string());
                        }
                    }
                }
            }
        }
        found
    }

    /// Remove `/* ... */` blocks, then `// ...` line comments.
    pub fn strip_comments(&self, text: &str) -> String {
        let without_blocks = self.block_comment.replace_all(text, "");
        self.line_comment
            .replace_all(&without_blocks, "")
            .into_owned()
    }
}

/// Keeps candidates that look like type names and are not excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFilter {
    pub excluded: BTreeSet<String>,
    pub require_uppercase: bool,
}

impl ReferenceFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
            require_uppercase: true,
        }
    }

    pub fn from_config(config: &ReferenceConfig) -> Self {
        Self {
            excluded: config.excluded_types.clone(),
            require_uppercase: config.require_uppercase,
        }
    }

    pub fn accepts(&self, token: &str) -> bool {
        let Some(first) = token.chars().next() else {
            return false;
        };
        if self.require_uppercase && !first.is_uppercase() {
            return false;
        }
        !self.excluded.contains(token)
    }

    pub fn retain(&self, candidates: BTreeSet<String>) -> BTreeSet<String> {
        candidates.into_iter().filter(|t| self.accepts(t)).collect()
    }
}

impl Default for ReferenceFilter {
    fn default() -> Self {
        Self::from_config(&ReferenceConfig::default())
    }
}

/// Read a source file, dropping invalid UTF-8 instead of failing.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| RefGraphError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_lossy(&bytes))
}

/// Decode bytes as UTF-8, dropping invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).replace('\u{FFFD}', ""),
    }
}
