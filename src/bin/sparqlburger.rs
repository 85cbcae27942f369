//! sparqlburger: the SPARQL recipe CLI
//!
//! Builds SPARQL queries from TOML or JSON recipes.
//!
//! # Usage
//!
//! ```bash
//! # Print the query a recipe describes
//! sparqlburger render people.toml
//!
//! # Write it to a file as JSON
//! sparqlburger render people.toml --format json --output people.json
//!
//! # Validate without printing
//! sparqlburger check people.toml
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sparqlburger::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sparqlburger")]
#[command(version)]
#[command(about = "🍔 Build SPARQL queries from declarative recipes", long_about = None)]
#[command(after_help = "EXAMPLES:
    sparqlburger render people.toml
    sparqlburger render update.json --format json -o update.out.json
    sparqlburger check people.toml
    sparqlburger prefixes")]
struct Cli {
    /// Config file with default prefixes
    #[arg(long, global = true, env = "SPARQLBURGER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a recipe and print the generated query
    Render {
        /// Recipe file (.toml or .json)
        recipe: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Build a recipe and report whether it is valid
    Check {
        /// Recipe file (.toml or .json)
        recipe: PathBuf,
    },
    /// Show the popular prefix table
    Prefixes,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Render {
            recipe,
            output,
            format,
        }) => render_recipe(recipe, output.as_deref(), format, &cli),
        Some(Commands::Check { recipe }) => check_recipe(recipe, &cli),
        Some(Commands::Prefixes) => {
            show_prefixes();
            Ok(())
        }
        None => {
            println!("{}", "🍔 sparqlburger: SPARQL query builder".cyan().bold());
            println!();
            println!("Usage: sparqlburger render <RECIPE> [OPTIONS]");
            println!();
            println!("Try: sparqlburger --help");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only query text.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "sparqlburger=debug"
    } else {
        "sparqlburger=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(path: &Path, cli: &Cli) -> anyhow::Result<(Recipe, BuiltQuery)> {
    let config = Config::discover(cli.config.as_deref()).context("Failed to load config")?;
    let recipe = Recipe::load(path)
        .with_context(|| format!("Failed to read recipe {}", path.display()))?;
    let built = recipe.build_with_prefixes(&config.prefixes())?;
    Ok((recipe, built))
}

fn render_recipe(
    path: &Path,
    output: Option<&Path>,
    format: &OutputFormat,
    cli: &Cli,
) -> anyhow::Result<()> {
    if cli.verbose {
        eprintln!("{} {}", "Recipe:".dimmed(), path.display().to_string().yellow());
    }

    let (recipe, built) = build(path, cli)?;
    let text = built.render();

    let rendered = match format {
        OutputFormat::Text => text,
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "form": recipe.form.to_string(),
            "query": text,
        }))?,
    };

    match output {
        Some(out) => {
            std::fs::write(out, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "{} Wrote query to {}",
                "✓".green(),
                out.display().to_string().cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn check_recipe(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let (recipe, built) = build(path, cli)?;
    println!(
        "{} {}: {} query, {} pattern(s)",
        "✓".green(),
        path.display().to_string().white(),
        recipe.form.to_string().cyan(),
        built.patterns.len().to_string().cyan()
    );
    Ok(())
}

fn show_prefixes() {
    println!("{}", "🍔 Popular Prefixes".cyan().bold());
    println!();

    println!(
        "{:8} {}",
        "Prefix".white().bold(),
        "Namespace".white().bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for (name, namespace) in POPULAR_PREFIXES {
        println!("{:8} {}", name.cyan().bold(), namespace.dimmed());
    }
}
