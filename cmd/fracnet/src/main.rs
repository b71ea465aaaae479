//! fracnet CLI - stochastic discrete fracture network generator.
//!
//! Commands:
//! - `fracnet generate` - Sample one or more realizations from a settings file
//! - `fracnet ingest` - Filter and report a fracture list
//! - `fracnet poles` - Collect fracture poles across a batch
//! - `fracnet init` - Write a default settings file
//! - `fracnet schema` - Print the settings JSON schema

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fracnet")]
#[command(about = "Stochastic discrete fracture network generator")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fracture network realizations
    Generate {
        /// Path to the settings file (.json, .yaml or .yml)
        #[arg(short, long, default_value = "settings.json")]
        settings: String,

        /// Batch output directory
        #[arg(short, long, default_value = "dfn")]
        output: String,

        /// Override the first seed
        #[arg(long, env = "FRACNET_SEED")]
        seed: Option<u64>,

        /// Override the realization count
        #[arg(short = 'n', long)]
        realizations: Option<usize>,

        /// Run realizations on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Build reports from an existing fracture list
    Ingest {
        /// Tab-separated fracture list
        #[arg(short, long)]
        list: String,

        /// Path to the settings file providing the domain
        #[arg(short, long, default_value = "settings.json")]
        settings: String,

        /// Output directory
        #[arg(short, long, default_value = "ingest")]
        output: String,

        /// Treat unknown shapes as rectangles instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Collect fracture poles from a batch directory
    Poles {
        /// Batch directory holding realization_* directories
        #[arg(short, long, default_value = "dfn")]
        batch: String,

        /// Output path (defaults to poles.tsv inside the batch directory)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write a default settings file
    Init {
        /// Settings file to create
        #[arg(default_value = "settings.json")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the JSON schema of the settings file
    Schema {
        /// Write the schema to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match cli.command {
        Commands::Generate {
            settings,
            output,
            seed,
            realizations,
            parallel,
        } => commands::generate::run(&settings, &output, seed, realizations, parallel),
        Commands::Ingest {
            list,
            settings,
            output,
            lenient,
        } => commands::ingest::run(&list, &settings, &output, lenient),
        Commands::Poles { batch, output } => commands::poles::run(&batch, output.as_deref()),
        Commands::Init { path, force } => commands::init::run(&path, force),
        Commands::Schema { output } => commands::schema::run(output.as_deref()),
    }
}
