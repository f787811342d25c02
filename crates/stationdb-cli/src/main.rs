mod pipeline;
mod seed;
mod stages;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stationdb_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::pipeline::report::{write_reports, StageStats};
use crate::pipeline::{run_pass, PassOptions};
use crate::stages::{RecordProcessor, RegulatorProcessor, ResolveProcessor, SiteProcessor};

#[derive(Debug, Parser)]
#[command(name = "stationdb-cli")]
#[command(about = "Broadcast station contact discovery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Expand the station directory into resolver input records
    Seed {
        /// Station directory YAML
        #[arg(long, default_value = "config/stations.yaml")]
        directory: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
    /// Resolve each station's official website from its encyclopedia article
    Resolve(PassArgs),
    /// Extract contact facts from each station's official website
    Contacts(PassArgs),
    /// Extract contact facts from each station's regulator public file
    Fcc(PassArgs),
}

#[derive(Debug, Args)]
struct PassArgs {
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    /// Call sign of the station to resume from, using the checkpoint for
    /// everything before it
    #[arg(long)]
    resume_from: Option<String>,

    /// Process only the first N eligible records
    #[arg(long)]
    limit: Option<usize>,
}

impl From<PassArgs> for PassOptions {
    fn from(args: PassArgs) -> Self {
        Self {
            input: args.input,
            output: args.output,
            resume_from: args.resume_from,
            limit: args.limit,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = stationdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Seed { directory, output }) => {
            seed::run_seed(&directory, &output)?;
        }
        Some(Commands::Resolve(args)) => {
            let processor = ResolveProcessor::from_config(&config)?;
            run_stage(&processor, &config, &args.into()).await?;
        }
        Some(Commands::Contacts(args)) => {
            let processor = SiteProcessor::from_config(&config)?;
            run_stage(&processor, &config, &args.into()).await?;
        }
        Some(Commands::Fcc(args)) => {
            let processor = RegulatorProcessor::from_config(&config)?;
            run_stage(&processor, &config, &args.into()).await?;
        }
        None => println!("no command given; run with --help for usage"),
    }

    Ok(())
}

/// Run one pass, then write its derived reports and log its summary.
/// Report failures are warnings; the main output is already written.
async fn run_stage<P: RecordProcessor>(
    processor: &P,
    config: &AppConfig,
    opts: &PassOptions,
) -> anyhow::Result<()> {
    let stage = processor.stage();
    let summary = run_pass(processor, config.stage(stage), opts).await?;

    tracing::info!(
        %stage,
        processed = summary.processed,
        failed = summary.failed,
        skipped = summary.skipped,
        resumed = summary.resumed,
        checkpoint_writes = summary.checkpoint_writes,
        "pass complete"
    );

    match write_reports(stage, &opts.output, &summary.records) {
        Ok(paths) => {
            for path in paths {
                tracing::info!(%stage, path = %path.display(), "report written");
            }
        }
        Err(e) => tracing::warn!(%stage, error = %e, "failed to write derived reports"),
    }
    StageStats::compute(stage, &summary.records).log(stage);
    Ok(())
}
