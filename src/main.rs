//! Local runner: flatten a snapshot file and publish it under an output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bi_ready::{run, LocalPlatform, RunConfig, RunOutcome};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bi-ready", version, about = "Flatten a building-model snapshot into BI-ready rows")]
struct Args {
    /// Snapshot JSON exported from the source model
    #[arg(long)]
    snapshot: PathBuf,
    /// Name of the source model (e.g. `folder/model1`)
    #[arg(long)]
    model_name: String,
    /// Directory receiving published versions
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
    /// Optional TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the output model prefix
    #[arg(long)]
    prefix: Option<String>,
    /// Keep `parameters` bags as exported
    #[arg(long)]
    no_promote: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(prefix) = args.prefix {
        config.target_model_prefix = prefix;
    }
    if args.no_promote {
        config.promote_parameters = false;
    }

    let platform = LocalPlatform::new(args.snapshot, args.model_name, args.out_dir);
    let outcome = run(&platform, &config).await;
    info!(?outcome, "run finished");

    Ok(match outcome {
        RunOutcome::Succeeded { .. } => ExitCode::SUCCESS,
        RunOutcome::TargetModelNotFound { .. } | RunOutcome::Failed(_) => ExitCode::FAILURE,
    })
}
