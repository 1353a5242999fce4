//! Source and sentinel constants shared across the pipeline.

// Remote sources
pub const METADATA_URL: &str =
    "http://discomap.eea.europa.eu/map/fme/metadata/PanEuropean_metadata.csv";
pub const GEOCODE_URL: &str = "https://search.mapzen.com/v1/reverse";
pub const EXISTING_STATIONS_URL: &str = "http://battuta.s3.amazonaws.com/eea-stations-all.json";

// Default output files for the two run modes
pub const INIT_OUTPUT_PATH: &str = "data/eea-stations-all.json";
pub const ADD_OUTPUT_PATH: &str = "data/eea-stations.json";
pub const CONFIG_PATH: &str = "config.toml";

// Positional fields in a metadata row
pub const STATION_ID_FIELD: usize = 5;
pub const LONGITUDE_FIELD: usize = 14;
pub const LATITUDE_FIELD: usize = 15;
pub const MIN_ROW_FIELDS: usize = 16;

/// Digits after the decimal point for every persisted coordinate.
pub const COORDINATE_PRECISION: usize = 6;

/// Placeholder for location and city when geocoding yields nothing usable.
pub const UNUSED: &str = "unused";

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_INTER_REQUEST_DELAY_MS: u64 = 2_000;

// Environment overrides
pub const API_KEY_ENV: &str = "PELIAS_KEY";
pub const TIMEOUT_ENV: &str = "EEA_TIMEOUT_MS";
pub const DELAY_ENV: &str = "EEA_GEOCODE_DELAY_MS";
