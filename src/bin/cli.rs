//! refgraph CLI - reference graphs for Java source trees.
//!
//! Usage:
//!   refgraph tree <seed> [--reverse]     # Dependency tree rooted at a file
//!   refgraph graph [--seed S]            # Whole (or reachable) reference graph
//!   refgraph classes                     # Class diagram from parsed types
//!   refgraph focus <seed> [--mode M]     # Bounded neighborhood around a seed
//!   refgraph stats                       # Counts as JSON
//!
//! Diagrams are written as Graphviz DOT by default; pipe into `dot -Tpng`.

use anyhow::{bail, Result};
use clap::Parser;
use refgraph::cli::{emit, print_usage, Cli, Commands, Mode, OutputFormat};
use refgraph::graph::scan_stats;
use refgraph::{
    analyze_references, analyze_types, class_view, find_unit_seed, focus_types_query,
    focus_units_query, full_view, reachable_view, stats_query, tree_query, AnalyzerConfig,
    GraphView, RefGraphError, TreeDirection,
};
use std::path::Path;
use tracing::info;

/// Exit code for a seed that matched nothing.
const EXIT_SEED_NOT_FOUND: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        if let Some(RefGraphError::SeedNotFound { seed, hints }) = e.downcast_ref::<RefGraphError>() {
            eprintln!("Error: no file or type matches '{}'", seed);
            if !hints.is_empty() {
                eprintln!("Available:");
                for hint in hints {
                    eprintln!("  {}", hint);
                }
            }
            std::process::exit(EXIT_SEED_NOT_FOUND);
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.as_ref() else {
        print_usage();
        return Ok(());
    };

    let config = cli.load_config();
    let root = cli.root.as_path();
    info!(root = %root.display(), "refgraph starting");

    match command {
        Commands::Tree {
            seed,
            reverse,
            format,
            output,
        } => {
            let graph = analyze_references(root, &config)?;
            let direction = if *reverse {
                TreeDirection::Dependents
            } else {
                TreeDirection::Dependencies
            };
            let response = tree_query(&graph, root, seed, direction, config.output.hint_limit)
                .ensure_found()?;
            let text = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&response)?,
                OutputFormat::Text => response.text(),
                OutputFormat::Dot => bail!("tree output is text or json"),
            };
            emit(&text, output.as_deref())?;
        }

        Commands::Graph {
            seed,
            format,
            output,
        } => {
            let graph = analyze_references(root, &config)?;
            let view = match seed {
                Some(seed) => {
                    let identity = find_unit_seed(&graph, root, seed, config.output.hint_limit)?;
                    reachable_view(&graph, &identity)
                }
                None => full_view(&graph),
            };
            emit(&render(&view, *format)?, output.as_deref())?;
        }

        Commands::Classes { format, output } => {
            let catalog = analyze_types(root, &config)?;
            let resolver = catalog
                .resolver()
                .with_tie_break(config.resolver.fuzzy_tie_break);
            let view = class_view(&catalog, &resolver);
            emit(&render(&view, *format)?, output.as_deref())?;
        }

        Commands::Focus {
            seed,
            rounds,
            mode,
            format,
            output,
        } => {
            let rounds = rounds.unwrap_or(config.focus.rounds);
            let hint_limit = config.output.hint_limit;
            let response = match mode {
                Mode::Ast => {
                    let catalog = analyze_types(root, &config)?;
                    let resolver = catalog
                        .resolver()
                        .with_tie_break(config.resolver.fuzzy_tie_break);
                    focus_types_query(&catalog, &resolver, root, seed, rounds, hint_limit)
                }
                Mode::Simple => {
                    let graph = analyze_references(root, &config)?;
                    focus_units_query(&graph, root, seed, rounds, hint_limit)
                }
            }
            .ensure_found()?;

            let text = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&response)?,
                _ => render(&response.view, *format)?,
            };
            emit(&text, output.as_deref())?;
        }

        Commands::Stats => {
            print_stats(root, &config)?;
        }
    }

    Ok(())
}

fn render(view: &GraphView, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Dot => view.to_dot(),
        OutputFormat::Json => serde_json::to_string_pretty(view)?,
        OutputFormat::Text => view.to_text(),
    })
}

fn print_stats(root: &Path, config: &AnalyzerConfig) -> Result<()> {
    let scan = scan_stats(root, &config.scan);
    info!("{}", scan);

    let graph = analyze_references(root, config)?;
    let catalog = analyze_types(root, config)?;
    let stats = stats_query(&graph, &catalog);

    let mut json = serde_json::to_value(&stats)?;
    json["files_by_extension"] = serde_json::to_value(&scan.by_extension)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
