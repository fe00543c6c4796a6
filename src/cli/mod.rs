//! CLI module for refgraph.
//!
//! Commands:
//! - Simple mode: tree, graph
//! - AST mode: classes
//! - Either mode: focus
//! - System: stats

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::AnalyzerConfig;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "refgraph")]
#[command(about = "Reference graphs for Java source trees")]
#[command(version)]
#[command(override_help = HELP_TEXT)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Config file (default: <root>/.refgraph.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        match &self.config {
            Some(path) => path.clone(),
            None => AnalyzerConfig::default_path(&self.root),
        }
    }

    pub fn load_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::load(&self.config_path())
    }
}

const HELP_TEXT: &str = "
refgraph - reference graphs for Java source trees

Simple mode (file references):
  tree <seed>           Dependency tree rooted at a file
                        (--reverse for what references it)
  graph                 Whole reference graph
  graph --seed <seed>   Everything reachable from a file

AST mode (type relationships):
  classes               Class diagram with extends/implements edges

Either mode:
  focus <seed>          Bounded neighborhood around a file or type
                        (--mode ast|simple, --rounds N)

Other:
  stats                 Unit, edge and type counts

Options:
  -r, --root <PATH>     Project root (default: .)
  -c, --config <FILE>   Config file (default: <root>/.refgraph.toml)
  -q, --quiet           Only log warnings
  -f, --format <FMT>    dot | json | text
  -o, --output <FILE>   Write to a file instead of stdout

Set RUST_LOG=debug for per-file detail.
";

#[derive(Subcommand)]
pub enum Commands {
    // ─── Simple Mode ────────────────────────────────────────────────
    /// Print the dependency tree rooted at a file
    Tree {
        /// File identity, path or stem
        seed: String,

        /// List what references the seed instead of what it references
        #[arg(long)]
        reverse: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Describe the whole reference graph, or what a seed reaches
    Graph {
        /// Only include what this file reaches
        #[arg(short, long)]
        seed: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    // ─── AST Mode ───────────────────────────────────────────────────
    /// Describe the class diagram of every parsed type
    Classes {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    // ─── Either Mode ────────────────────────────────────────────────
    /// Describe the neighborhood around a seed
    Focus {
        /// Type name, file path or file stem
        seed: String,

        /// Expansion rounds (default: [focus] rounds from config)
        #[arg(long)]
        rounds: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = Mode::Ast)]
        mode: Mode,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    // ─── System ─────────────────────────────────────────────────────
    /// Show unit, edge and type counts as JSON
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Dot,
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Typed relationships from parsed declarations
    Ast,
    /// Untyped references between files
    Simple,
}

/// Print usage help
pub fn print_usage() {
    print!("{}", HELP_TEXT);
}

/// Write `text` to `output`, or stdout when none is given.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut text = text.to_string();
            if !text.ends_with('\n') {
                text.push('\n');
            }
            std::fs::write(path, text)?;
            Ok(())
        }
        None => {
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_focus_command() {
        let cli = Cli::parse_from([
            "refgraph", "-r", "proj", "focus", "app.Main", "--rounds", "2", "--mode", "simple",
            "-f", "json",
        ]);
        assert_eq!(cli.root, PathBuf::from("proj"));
        assert_eq!(cli.config_path(), PathBuf::from("proj/.refgraph.toml"));
        match cli.command {
            Some(Commands::Focus {
                seed,
                rounds,
                mode,
                format,
                output,
            }) => {
                assert_eq!(seed, "app.Main");
                assert_eq!(rounds, Some(2));
                assert_eq!(mode, Mode::Simple);
                assert_eq!(format, OutputFormat::Json);
                assert!(output.is_none());
            }
            _ => panic!("expected focus command"),
        }
    }

    #[test]
    fn test_defaults_and_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["refgraph", "graph", "-c", "custom.toml", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.config_path(), PathBuf::from("custom.toml"));
        match cli.command {
            Some(Commands::Graph { seed, format, .. }) => {
                assert!(seed.is_none());
                assert_eq!(format, OutputFormat::Dot);
            }
            _ => panic!("expected graph command"),
        }
    }

    #[test]
    fn test_parse_reverse_tree() {
        let cli = Cli::parse_from(["refgraph", "tree", "Store", "--reverse"]);
        match cli.command {
            Some(Commands::Tree { seed, reverse, format, .. }) => {
                assert_eq!(seed, "Store");
                assert!(reverse);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected tree command"),
        }
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["refgraph"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dot");
        emit("digraph {}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "digraph {}\n");
    }

    #[test]
    fn test_emit_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.dot");
        let err = emit("digraph {}", Some(&path)).unwrap_err();
        assert!(matches!(err, crate::error::RefGraphError::Io(_)));
    }
}
