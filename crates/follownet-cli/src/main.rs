//! follownet - bipartite follower network analysis CLI
//!
//! Usage:
//!   follownet stats relations.csv              # Counts, components, degree CCDFs
//!   follownet communities relations.csv        # Projection + Louvain communities
//!   follownet ca relations.csv --dataset news  # Correspondence analysis + CSV export
//!   follownet run relations.csv                # Everything above
//!   follownet --config run.toml config         # Print the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::ca::{CaOptions, MethodArg};
use commands::InputArgs;
use error::Result;
use follownet::config::PipelineConfig;

/// follownet - structure and embeddings of follower → entity networks
#[derive(Parser)]
#[command(name = "follownet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Node/edge counts, components, degree distributions, top entities
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Number of top entities by in-degree
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Entity projection and Louvain communities
    Communities {
        #[command(flatten)]
        input: InputArgs,

        /// Seed of the node visit order
        #[arg(long)]
        seed: Option<u64>,

        /// Resolution (> 1 favors smaller communities)
        #[arg(long)]
        resolution: Option<f64>,

        /// List the entities of each community
        #[arg(long)]
        members: bool,
    },

    /// Correspondence analysis with coordinate export
    Ca {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        ca: CaArgs,
    },

    /// Run graph checks, communities and correspondence analysis
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Seed of the Louvain visit order
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        ca: CaArgs,
    },

    /// Print the effective configuration
    Config,
}

#[derive(clap::Args)]
struct CaArgs {
    /// Maximum dimensions to compute
    #[arg(long)]
    components: Option<usize>,

    /// Leading dimensions to export
    #[arg(long)]
    dimensions: Option<usize>,

    /// SVD backend
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Parent directory of `<dataset>_coords`
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Replace earlier exports instead of adding a numeric suffix
    #[arg(long)]
    overwrite: bool,

    /// Skip writing coordinate files
    #[arg(long)]
    no_export: bool,
}

impl From<CaArgs> for CaOptions {
    fn from(args: CaArgs) -> Self {
        Self {
            components: args.components,
            dimensions: args.dimensions,
            method: args.method,
            save_dir: args.save_dir,
            overwrite: args.overwrite,
            no_export: args.no_export,
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn base_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) if !path.is_file() => Err(error::CliError::FileNotFound(path.clone())),
        Some(path) => Ok(PipelineConfig::from_path(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = base_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Stats { input, top_k } => commands::stats::run(&input, config, top_k, cli.json),

        Commands::Communities {
            input,
            seed,
            resolution,
            members,
        } => commands::communities::run(&input, config, seed, resolution, members, cli.json),

        Commands::Ca { input, ca } => commands::ca::run(&input, config, &ca.into(), cli.json),

        Commands::Run { input, seed, ca } => {
            commands::run::run(&input, config, seed, &ca.into(), cli.json)
        }

        Commands::Config => commands::config::run(&config, cli.json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
