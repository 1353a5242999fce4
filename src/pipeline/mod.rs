// Station enrichment pipeline: fetch -> normalize -> filter -> geocode -> merge

pub mod ingestion;
pub mod processing;

use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::error::Result;
use crate::types::StationRecord;
use chrono::{DateTime, Utc};
use ingestion::{ExistingStationSource, MetadataFetcher};
use metrics::counter;
use processing::merge::merge_stations;
use processing::normalize::normalize_stations;
use processing::novelty::filter_novel;
use processing::ReverseGeocoder;
use std::sync::Arc;
use tracing::{info, instrument};

/// Which dataset a run produces.
#[derive(Debug, Clone)]
pub enum RunMode {
    /// Geocode every station in the feed.
    Init,
    /// Geocode only stations missing from `existing`, then append the rest.
    Incremental { existing: ExistingStationSource },
}

/// Result of a run that produced a dataset.
#[derive(Debug)]
pub struct RunReport {
    pub stations: Vec<StationRecord>,
    pub new_stations: usize,
    pub existing_stations: usize,
    pub unenriched_stations: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunReport),
    /// Nothing new to geocode. Not an error; nothing should be written.
    NoNewStations,
}

pub struct StationPipeline {
    config: Config,
    http: Arc<dyn HttpClientPort>,
}

impl StationPipeline {
    pub fn new(config: Config, http: Arc<dyn HttpClientPort>) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[instrument(skip(self))]
    pub async fn run(&self, mode: RunMode) -> Result<RunOutcome> {
        let started_at = Utc::now();
        counter!("eea_pipeline_runs_total").increment(1);
        let fetcher = MetadataFetcher::new(self.http.clone(), self.config.metadata_url.clone());

        // The two sources are independent, so fetch them together.
        let (rows, existing) = match &mode {
            RunMode::Init => (fetcher.fetch().await?, None),
            RunMode::Incremental { existing } => {
                let (rows, existing) = tokio::join!(fetcher.fetch(), existing.load(&*self.http));
                (rows?, Some(existing))
            }
        };

        let key = self.config.dedup_key;
        let candidates = normalize_stations(&rows, key);
        let novel = filter_novel(candidates, existing.as_ref(), key);
        if novel.is_empty() {
            info!("No new stations to add");
            return Ok(RunOutcome::NoNewStations);
        }

        let geocoder = ReverseGeocoder::from_config(self.http.clone(), &self.config);
        let enriched = geocoder.enrich_all(novel).await;
        let unenriched_stations = enriched.iter().filter(|s| s.is_unenriched()).count();
        let new_stations = enriched.len();

        let existing = existing.unwrap_or_default();
        let existing_stations = existing.len();
        let stations = merge_stations(enriched, existing);

        counter!("eea_stations_added_total").increment(new_stations as u64);
        info!(
            new_stations,
            existing_stations,
            unenriched_stations,
            total = stations.len(),
            "Station pipeline finished"
        );

        Ok(RunOutcome::Completed(RunReport {
            stations,
            new_stations,
            existing_stations,
            unenriched_stations,
            started_at,
            finished_at: Utc::now(),
        }))
    }
}
