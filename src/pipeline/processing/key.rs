//! Station identity used for deduplication and novelty checks.
//!
//! Freshly normalized candidates and previously persisted records are keyed
//! through the same functions here, so a station that went through another
//! round of rounding in the stored dataset still compares equal.

use crate::constants::COORDINATE_PRECISION;
use crate::types::CanonicalStation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which part of a station identifies it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// Canonical latitude only. Matches the historical dataset.
    #[default]
    Latitude,
    /// Canonical `latitude,longitude` pair.
    Coordinate,
    StationId,
}

impl DedupKey {
    pub fn for_station(&self, station: &CanonicalStation) -> String {
        self.compose(&station.station_id, &station.latitude, &station.longitude)
    }

    /// Key for a persisted entry: a station object or a bare id string.
    ///
    /// Returns `None` when the entry lacks the fields this key needs.
    pub fn for_record(&self, record: &Value) -> Option<String> {
        match (self, record) {
            (DedupKey::StationId, Value::String(id)) => Some(id.clone()),
            (_, Value::Object(fields)) => {
                let id = fields.get("stationId").and_then(Value::as_str).unwrap_or_default();
                let latitude = fields.get("latitude").and_then(canonical_from_value);
                let longitude = fields.get("longitude").and_then(canonical_from_value);
                match self {
                    DedupKey::StationId if !id.is_empty() => Some(id.to_string()),
                    DedupKey::Latitude => latitude.map(|lat| self.compose(id, &lat, "")),
                    DedupKey::Coordinate => match (latitude, longitude) {
                        (Some(lat), Some(lon)) => Some(self.compose(id, &lat, &lon)),
                        _ => None,
                    },
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn compose(&self, station_id: &str, latitude: &str, longitude: &str) -> String {
        match self {
            DedupKey::Latitude => latitude.to_string(),
            DedupKey::Coordinate => format!("{latitude},{longitude}"),
            DedupKey::StationId => station_id.to_string(),
        }
    }
}

/// Format a coordinate with exactly six digits after the decimal point.
pub fn canonical_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}

/// Parse a raw coordinate field and canonicalize it.
///
/// Non-numeric and non-finite input yields `None`.
pub fn parse_coordinate(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then(|| canonical_coordinate(value))
}

fn canonical_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(canonical_coordinate),
        Value::String(s) => parse_coordinate(s),
        _ => None,
    }
}
