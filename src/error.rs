//! Error types for refgraph.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RefGraphError>;

#[derive(Debug, Error)]
pub enum RefGraphError {
    /// A source file could not be read. Recovered per unit by the builders.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source unit could not be parsed. Recovered per unit by the builders.
    #[error("parse error{}: {message}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// The requested seed file or symbol does not map to any analyzed identity.
    #[error("seed not found: {seed}")]
    SeedNotFound { seed: String, hints: Vec<String> },

    #[error("root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A tree-sitter grammar could not be loaded. Fatal for AST mode.
    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefGraphError {
    pub fn parse(message: impl Into<String>) -> Self {
        RefGraphError::Parse {
            path: None,
            message: message.into(),
        }
    }

    /// Attach a path to a parse error that was raised without one.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            RefGraphError::Parse {
                path: None,
                message,
            } => RefGraphError::Parse {
                path: Some(path.into()),
                message,
            },
            other => other,
        }
    }

    /// Hints attached to a `SeedNotFound` error, empty otherwise.
    pub fn hints(&self) -> &[String] {
        match self {
            RefGraphError::SeedNotFound { hints, .. } => hints,
            _ => &[],
        }
    }
}

/// Shorten an error message for log lines, respecting char boundaries.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message_short_is_untouched() {
        assert_eq!(truncate_message("boom", 100), "boom");
    }

    #[test]
    fn test_truncate_message_long_is_cut() {
        let long = "x".repeat(150);
        let cut = truncate_message(&long, 100);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_message_multibyte() {
        let text = "é".repeat(10);
        assert_eq!(truncate_message(&text, 3), "ééé...");
    }

    #[test]
    fn test_parse_error_with_path() {
        let err = RefGraphError::parse("unexpected token").with_path("src/A.java");
        assert_eq!(
            err.to_string(),
            "parse error in src/A.java: unexpected token"
        );
    }

    #[test]
    fn test_grammar_error_names_language() {
        let err = RefGraphError::Grammar {
            language: "Java",
            message: "incompatible ABI version".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to load Java grammar: incompatible ABI version"
        );
        // Not a parse error, so attaching a unit path leaves it alone.
        let err = err.with_path("src/A.java");
        assert!(matches!(err, RefGraphError::Grammar { .. }));
    }

    #[test]
    fn test_seed_not_found_hints() {
        let err = RefGraphError::SeedNotFound {
            seed: "Nope".to_string(),
            hints: vec!["a.A".to_string()],
        };
        assert_eq!(err.hints(), ["a.A".to_string()]);
        assert!(RefGraphError::Config("x".into()).hints().is_empty());
    }
}
