use crate::app::ports::HttpClientPort;
use crate::pipeline::processing::key::DedupKey;
use crate::storage;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Where the previously published dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingStationSource {
    File(PathBuf),
    Remote(String),
}

impl ExistingStationSource {
    /// `http://` and `https://` locations are remote, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ExistingStationSource::Remote(location.to_string())
        } else {
            ExistingStationSource::File(PathBuf::from(location))
        }
    }

    /// Load the dataset; any failure leaves an empty set behind.
    #[instrument(skip(self, http))]
    pub async fn load(&self, http: &dyn HttpClientPort) -> ExistingStationSet {
        let records = match self {
            ExistingStationSource::File(path) => match storage::read_stations(path) {
                Ok(records) => records,
                Err(e) => {
                    warn!("Could not read existing stations from {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            ExistingStationSource::Remote(url) => fetch_remote(http, url).await,
        };
        info!("Loaded {} existing stations", records.len());
        ExistingStationSet::new(records)
    }
}

async fn fetch_remote(http: &dyn HttpClientPort, url: &str) -> Vec<Value> {
    let resp = match http.get(url).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Existing stations unavailable at {}: {}", url, e);
            return Vec::new();
        }
    };
    if !resp.is_success() {
        warn!("Existing stations at {} responded with status {}", url, resp.status);
        return Vec::new();
    }
    match serde_json::from_slice::<Vec<Value>>(&resp.bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!("Existing stations at {} are not a JSON array: {}", url, e);
            Vec::new()
        }
    }
}

/// The previously persisted dataset, read once and never modified.
#[derive(Debug, Clone, Default)]
pub struct ExistingStationSet {
    records: Vec<Value>,
}

impl ExistingStationSet {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Value> {
        self.records
    }

    /// Membership keys of every entry that carries the fields `key` needs.
    pub fn keys(&self, key: DedupKey) -> HashSet<String> {
        self.records.iter().filter_map(|r| key.for_record(r)).collect()
    }
}
