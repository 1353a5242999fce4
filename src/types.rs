use crate::constants::UNUSED;
use serde::{Deserialize, Serialize};

/// One parsed line of the tab-delimited metadata feed, fields in feed order.
pub type RawMetadataRow = Vec<String>;

/// A station reduced to its id and canonical (6 decimal) coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalStation {
    pub station_id: String,
    pub latitude: String,
    pub longitude: String,
}

/// A station with its reverse-geocoded place information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedStation {
    #[serde(flatten)]
    pub station: CanonicalStation,
    pub location: String,
    pub city: String,
    pub bounds: Vec<f64>,
}

impl EnrichedStation {
    /// True when geocoding contributed nothing beyond the defaults.
    pub fn is_unenriched(&self) -> bool {
        self.location == UNUSED && self.city == UNUSED && self.bounds.is_empty()
    }
}

/// One entry of a merged dataset.
///
/// Previously persisted entries are carried through untouched, whatever shape
/// they had on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StationRecord {
    Enriched(EnrichedStation),
    Existing(serde_json::Value),
}

/// Reverse geocoding response (Pelias / GeoJSON feature collection).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<GeocodeFeature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeFeature {
    #[serde(default)]
    pub properties: PlaceProperties,
    /// Kept loose so one malformed entry does not discard the properties.
    #[serde(default)]
    pub bbox: Option<Vec<serde_json::Value>>,
}

/// The subset of feature properties the location resolver looks at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceProperties {
    pub locality: Option<String>,
    pub localadmin: Option<String>,
    pub neighbourhood: Option<String>,
    pub county: Option<String>,
    pub region: Option<String>,
    pub macroregion: Option<String>,
    pub macrocounty: Option<String>,
    pub name: Option<String>,
}
