use anyhow::Context;
use clap::{Parser, Subcommand};
use eea_stations::constants;
use eea_stations::infra::ReqwestHttp;
use eea_stations::logging;
use eea_stations::pipeline::ingestion::ExistingStationSource;
use eea_stations::pipeline::processing::DedupKey;
use eea_stations::storage;
use eea_stations::{Config, RunMode, RunOutcome, StationPipeline};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "eea-stations")]
#[command(about = "Build and update the reverse-geocoded EEA station dataset")]
#[command(version)]
struct Cli {
    /// TOML configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the station identity used for deduplication
    #[arg(long, global = true, value_enum)]
    dedup_key: Option<DedupKey>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reverse geocode every station in the metadata feed
    Init {
        #[arg(long, default_value = constants::INIT_OUTPUT_PATH)]
        output: PathBuf,
    },
    /// Geocode only stations missing from an existing dataset and append them
    Add {
        #[arg(long, default_value = constants::ADD_OUTPUT_PATH)]
        output: PathBuf,
        /// Existing dataset: a local path or an http(s) URL
        #[arg(long)]
        existing: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(key) = cli.dedup_key {
        config.dedup_key = key;
    }

    let http = Arc::new(ReqwestHttp::new(config.timeout())?);

    match cli.command {
        Commands::Init { output } => {
            info!("Initializing stations");
            let pipeline = StationPipeline::new(config, http);
            let outcome = pipeline.run(RunMode::Init).await;
            match &outcome {
                Ok(RunOutcome::Completed(report)) => write(&output, &report.stations)?,
                Ok(RunOutcome::NoNewStations) => {}
                Err(e) => error!("Station initialization failed: {}", e),
            }
            println!("{}", init_message(&outcome));
            outcome?;
        }
        Commands::Add { output, existing } => {
            info!("Adding stations");
            let location = existing.unwrap_or_else(|| config.existing_stations_url.clone());
            let mode = RunMode::Incremental {
                existing: ExistingStationSource::parse(&location),
            };
            let pipeline = StationPipeline::new(config, http);
            let outcome = pipeline.run(mode).await;
            match &outcome {
                Ok(RunOutcome::Completed(report)) => {
                    write(&output, &report.stations)?;
                    info!("Added {} new stations", report.new_stations);
                }
                Ok(RunOutcome::NoNewStations) => {}
                Err(e) => error!("Adding stations failed: {}", e),
            }
            println!("{}", add_message(&outcome));
            outcome?;
        }
    }
    Ok(())
}

fn init_message(outcome: &eea_stations::Result<RunOutcome>) -> &'static str {
    match outcome {
        Ok(RunOutcome::Completed(_)) => "Reverse geocoded stations generated!",
        Ok(RunOutcome::NoNewStations) | Err(_) => "Unable to reverse geocode stations!",
    }
}

fn add_message(outcome: &eea_stations::Result<RunOutcome>) -> &'static str {
    match outcome {
        Ok(RunOutcome::Completed(_)) => "New stations added!",
        Ok(RunOutcome::NoNewStations) => "No new stations to add!",
        Err(_) => "Unable to add stations!",
    }
}

fn write(path: &Path, stations: &[eea_stations::types::StationRecord]) -> anyhow::Result<()> {
    storage::write_stations(path, stations)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {} stations to {}", stations.len(), path.display());
    Ok(())
}
