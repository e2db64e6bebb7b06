//! edmpath CLI - inspect route patterns and translate request paths.
//!
//! Works against the bundled sample models, so pattern and option changes
//! can be tried without wiring a web framework.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use edmpath::Config;

/// OData route pattern inspection tool.
///
/// Compiles route patterns into segment templates and translates captured
/// route values into typed OData paths.
#[derive(Parser)]
#[command(name = "edmpath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Sample model to work against
    #[arg(long, global = true, default_value = "customers")]
    model: SampleModel,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Resolve schema names and keywords ignoring case
    #[arg(long, global = true)]
    case_insensitive: bool,

    /// Suppress output and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

/// Bundled sample models.
#[derive(Clone, Copy, ValueEnum, Default)]
enum SampleModel {
    /// Customers, orders, and their operations
    #[default]
    Customers,
    /// Open entity and complex types
    Open,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Translate a route pattern with captured route values
    Translate {
        /// Route pattern, e.g. `Customers({key})/Orders`
        pattern: String,

        /// Captured route value as NAME=VALUE; repeat a name to fill repeated placeholders
        #[arg(long = "value", value_parser = parse_route_value)]
        values: Vec<(String, String)>,

        /// HTTP method of the request
        #[arg(long, default_value = "GET")]
        method: String,
    },

    /// Show the candidate templates a pattern compiles into
    Template {
        /// Route pattern
        pattern: String,
    },

    /// List the sample model's types, navigation sources, and operations
    Schema,
}

fn parse_route_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config = Config::default().with_case_insensitive(cli.case_insensitive);

    let result = match cli.command {
        Commands::Translate {
            pattern,
            values,
            method,
        } => commands::translate::run(
            &pattern, values, &method, cli.model, config, cli.format, cli.quiet,
        ),
        Commands::Template { pattern } => {
            commands::template::run(&pattern, &config, cli.format, cli.quiet)
        }
        Commands::Schema => commands::schema::run(cli.model, cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
