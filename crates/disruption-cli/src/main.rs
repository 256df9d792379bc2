mod cmd;
mod output;
mod workdir;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, jobs::JobsSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "disruptions",
    about = "Consolidate CI disruption events into per-run interval history",
    version,
    propagate_version = true
)]
struct Cli {
    /// Working directory holding orig/, processed/ and config.yaml
    /// (default: auto-detect upward from the current directory)
    #[arg(long, global = true, env = "DISRUPTION_WORKDIR")]
    workdir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild job snapshots from cached raw artifacts
    Process {
        /// Job names to process
        jobs: Vec<String>,

        /// Process every job listed in config.yaml
        #[arg(long, conflicts_with = "jobs")]
        all: bool,
    },

    /// Show a processed job
    Show { job: String },

    /// List the metrics (locators) observed in a processed job
    Metrics { job: String },

    /// Show one metric across every run of a processed job
    Metric { job: String, metric: String },

    /// Manage the known job list
    Jobs {
        #[command(subcommand)]
        subcommand: JobsSubcommand,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the read-only query API
    Serve {
        /// Port to listen on (default: server.port from config.yaml)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Process { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let workdir = workdir::resolve_workdir(cli.workdir.as_deref());

    let result = match cli.command {
        Commands::Process { jobs, all } => cmd::process::run(&workdir, jobs, all, cli.json),
        Commands::Show { job } => cmd::show::run(&workdir, &job, cli.json),
        Commands::Metrics { job } => cmd::metric::list(&workdir, &job, cli.json),
        Commands::Metric { job, metric } => cmd::metric::show(&workdir, &job, &metric, cli.json),
        Commands::Jobs { subcommand } => cmd::jobs::run(&workdir, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&workdir, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&workdir, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
