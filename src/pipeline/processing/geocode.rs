use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::pipeline::ingestion::rate_limiter::Pacer;
use crate::pipeline::processing::resolve::enrich_station;
use crate::types::{CanonicalStation, EnrichedStation, GeocodeResponse};
use metrics::counter;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Outcome of a single reverse geocoding call.
#[derive(Debug)]
pub enum GeocodeOutcome {
    /// The service answered; `features` may still be empty.
    Resolved(GeocodeResponse),
    /// Transport failure, non-success status or unreadable body.
    Failed(String),
}

impl GeocodeOutcome {
    pub fn response(&self) -> Option<&GeocodeResponse> {
        match self {
            GeocodeOutcome::Resolved(r) => Some(r),
            GeocodeOutcome::Failed(_) => None,
        }
    }
}

/// Sequential, paced client for a Pelias-style `/v1/reverse` endpoint.
pub struct ReverseGeocoder {
    http: Arc<dyn HttpClientPort>,
    endpoint: String,
    api_key: String,
    layers: Vec<String>,
    pacer: Pacer,
}

impl ReverseGeocoder {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            layers: Vec::new(),
            pacer: Pacer::new(delay),
        }
    }

    pub fn from_config(http: Arc<dyn HttpClientPort>, config: &Config) -> Self {
        Self::new(
            http,
            config.geocode_url.clone(),
            config.api_key.clone(),
            config.inter_request_delay(),
        )
        .with_layers(config.layers.clone())
    }

    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    /// Request URL for `station`.
    pub fn request_url(&self, station: &CanonicalStation) -> Result<Url, String> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("point.lat", station.latitude.clone()),
            ("point.lon", station.longitude.clone()),
        ];
        if !self.layers.is_empty() {
            params.push(("layers", self.layers.join(",")));
        }
        Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| format!("invalid geocode endpoint '{}': {}", self.endpoint, e))
    }

    /// Geocode one station, waiting out the inter-request delay first.
    ///
    /// Never fails: every problem is folded into [`GeocodeOutcome::Failed`].
    #[instrument(skip(self, station), fields(station_id = %station.station_id))]
    pub async fn geocode(&self, station: &CanonicalStation) -> GeocodeOutcome {
        let url = match self.request_url(station) {
            Ok(url) => url,
            Err(e) => return GeocodeOutcome::Failed(e),
        };

        let _permit = self.pacer.acquire().await;
        debug!("Reverse geocoding {},{}", station.latitude, station.longitude);

        let resp = match self.http.get(url.as_str()).await {
            Ok(resp) => resp,
            Err(e) => return GeocodeOutcome::Failed(e.to_string()),
        };
        if !resp.is_success() {
            return GeocodeOutcome::Failed(format!("geocoder responded with status {}", resp.status));
        }
        match serde_json::from_slice::<GeocodeResponse>(&resp.bytes) {
            Ok(parsed) => GeocodeOutcome::Resolved(parsed),
            Err(e) => GeocodeOutcome::Failed(format!("unreadable geocoder response: {e}")),
        }
    }

    /// Geocode `stations` one after another and build their enriched records.
    ///
    /// Output order and length match the input; a failed lookup degrades that
    /// station to the unenriched defaults.
    #[instrument(skip(self, stations), fields(count = stations.len()))]
    pub async fn enrich_all(&self, stations: Vec<CanonicalStation>) -> Vec<EnrichedStation> {
        let total = stations.len();
        info!(
            "Reverse geocoding {} stations (~{}s at {:?} per request)",
            total,
            (self.pacer.delay() * total as u32).as_secs(),
            self.pacer.delay()
        );

        let mut enriched = Vec::with_capacity(total);
        let mut failed = 0usize;
        let mut empty = 0usize;

        for (i, station) in stations.into_iter().enumerate() {
            let outcome = self.geocode(&station).await;
            match &outcome {
                GeocodeOutcome::Resolved(r) if r.features.is_empty() => {
                    debug!(station_id = %station.station_id, "No features returned");
                    counter!("eea_geocode_requests_total", "outcome" => "empty").increment(1);
                    empty += 1;
                }
                GeocodeOutcome::Resolved(_) => {
                    counter!("eea_geocode_requests_total", "outcome" => "resolved").increment(1);
                }
                GeocodeOutcome::Failed(reason) => {
                    warn!(station_id = %station.station_id, "Reverse geocoding failed: {}", reason);
                    counter!("eea_geocode_requests_total", "outcome" => "failed").increment(1);
                    failed += 1;
                }
            }
            enriched.push(enrich_station(station, outcome.response()));

            if (i + 1) % 25 == 0 {
                info!("Geocoded {}/{} stations", i + 1, total);
            }
        }

        info!(total, failed, empty, "Reverse geocoding finished");
        enriched
    }
}
