//! Language detection and tree-sitter grammar loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tree_sitter::Language;

use crate::error::{RefGraphError, Result};

/// Languages with an AST-mode parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceLanguage {
    Java,
}

impl SourceLanguage {
    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "java" => Some(SourceLanguage::Java),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), but reports the offending path.
    pub fn require(path: &Path) -> Result<Self> {
        Self::from_path(path)
            .ok_or_else(|| RefGraphError::UnsupportedLanguage(path.display().to_string()))
    }

    /// Get the tree-sitter Language for this language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::Java => "Java",
        }
    }
}
