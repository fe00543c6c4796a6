//! Analyzer configuration loaded from `.refgraph.toml`.
//!
//! Every section is optional. A missing file yields the defaults; a file that
//! cannot be read or parsed is reported with a warning and also yields the
//! defaults, so configuration problems never stop an analysis run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{RefGraphError, Result};

/// File name looked up in the project root when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = ".refgraph.toml";

/// Platform types that appear almost everywhere and carry no architectural signal.
pub const DEFAULT_EXCLUDED_TYPES: [&str; 5] = ["String", "System", "Object", "Integer", "Boolean"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub scan: ScanConfig,
    pub references: ReferenceConfig,
    pub resolver: ResolverConfig,
    pub focus: FocusConfig,
    pub output: OutputConfig,
}

/// Which files are discovered under the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions (without the dot) treated as source units.
    pub extensions: Vec<String>,
    /// Descend into hidden files and directories.
    pub include_hidden: bool,
    /// Honor `.gitignore`, global gitignore and `.git/info/exclude`.
    pub respect_gitignore: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["java".to_string()],
            include_hidden: false,
            respect_gitignore: true,
        }
    }
}

/// Post-filter applied to heuristic reference candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub excluded_types: BTreeSet<String>,
    /// Keep only candidates whose first character is uppercase.
    pub require_uppercase: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            excluded_types: DEFAULT_EXCLUDED_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            require_uppercase: true,
        }
    }
}

/// How the fuzzy resolution tier picks among several containment matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyTieBreak {
    /// First match over the lexicographically sorted identities.
    #[default]
    FirstLexical,
    /// Shortest matching identity, ties broken lexicographically.
    ShortestName,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub fuzzy_tie_break: FuzzyTieBreak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Maximum number of expansion rounds for focused subgraphs.
    pub rounds: usize,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self { rounds: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// How many known identities to suggest when a seed cannot be found.
    pub hint_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { hint_limit: 10 }
    }
}

impl AnalyzerConfig {
    /// Load config from `path`, falling back to defaults on any problem.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load config from `path`, reporting read and parse failures.
    pub fn try_load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RefGraphError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RefGraphError::Config(e.to_string()))
    }

    /// Default config location for a project root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.scan.extensions, vec!["java"]);
        assert!(config.scan.respect_gitignore);
        assert!(!config.scan.include_hidden);
        assert_eq!(config.focus.rounds, 3);
        assert_eq!(config.output.hint_limit, 10);
        assert!(config.references.excluded_types.contains("Object"));
        assert_eq!(config.references.excluded_types.len(), 5);
        assert_eq!(config.resolver.fuzzy_tie_break, FuzzyTieBreak::FirstLexical);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
[focus]
rounds = 5

[resolver]
fuzzy_tie_break = "shortest_name"
"#,
        )
        .unwrap();
        assert_eq!(config.focus.rounds, 5);
        assert_eq!(config.resolver.fuzzy_tie_break, FuzzyTieBreak::ShortestName);
        assert_eq!(config.scan.extensions, vec!["java"]);
        assert_eq!(config.output.hint_limit, 10);
    }

    #[test]
    fn test_custom_exclusions_replace_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
[references]
excluded_types = ["Logger"]
"#,
        )
        .unwrap();
        assert_eq!(config.references.excluded_types.len(), 1);
        assert!(config.references.excluded_types.contains("Logger"));
        assert!(config.references.require_uppercase);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AnalyzerConfig::from_toml_str("[focus\nrounds = ").unwrap_err();
        assert!(matches!(err, RefGraphError::Config(_)));
    }

    #[test]
    fn test_load_missing_and_invalid_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(AnalyzerConfig::load(&missing).focus.rounds, 3);

        let broken = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&broken, "focus = [").unwrap();
        assert_eq!(AnalyzerConfig::load(&broken).focus.rounds, 3);

        std::fs::write(&broken, "[output]\nhint_limit = 4\n").unwrap();
        assert_eq!(AnalyzerConfig::load(&broken).output.hint_limit, 4);
        assert_eq!(AnalyzerConfig::default_path(dir.path()), broken);
    }
}
