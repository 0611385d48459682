use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use zonelint::{run_report, run_validation, InputPaths, ReportOptions, EXIT_LOAD_ERROR};

#[derive(Parser)]
#[command(name = "zonelint")]
#[command(about = "Validate geographic zone boundaries before publishing them", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Zone boundaries (GeoJSON FeatureCollection)
    #[arg(short, long, env = "ZONELINT_WORLD")]
    world: PathBuf,

    /// Zone registry: directory of <zone>.yaml files or a single mapping file
    #[arg(short, long, env = "ZONELINT_ZONES")]
    zones: PathBuf,

    /// Validation thresholds (TOML)
    #[arg(short, long, env = "ZONELINT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for diagnostic artifacts, overrides ERROR_PATH
    #[arg(short, long)]
    error_path: Option<PathBuf>,
}

impl From<Inputs> for InputPaths {
    fn from(inputs: Inputs) -> Self {
        InputPaths {
            world: inputs.world,
            zones: inputs.zones,
            config: inputs.config,
            error_path: inputs.error_path,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and stop at the first failing check
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },

    /// Run every check and print a report
    Report {
        #[command(flatten)]
        inputs: Inputs,

        /// Output report file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate { inputs } => run_validation(&inputs.into()),
        Commands::Report {
            inputs,
            output,
            json,
        } => run_report(&inputs.into(), &ReportOptions { json, output }),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_LOAD_ERROR);
        }
    }
}
