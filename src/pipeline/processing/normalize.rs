use crate::constants::{LATITUDE_FIELD, LONGITUDE_FIELD, MIN_ROW_FIELDS, STATION_ID_FIELD};
use crate::pipeline::processing::key::{parse_coordinate, DedupKey};
use crate::types::{CanonicalStation, RawMetadataRow};
use std::collections::HashSet;
use tracing::{debug, info};

/// Map a metadata row onto a canonical station.
///
/// Rows that are too short or carry non-numeric coordinates yield `None`.
pub fn to_canonical(row: &RawMetadataRow) -> Option<CanonicalStation> {
    if row.len() < MIN_ROW_FIELDS {
        return None;
    }
    Some(CanonicalStation {
        station_id: row[STATION_ID_FIELD].trim().to_string(),
        latitude: parse_coordinate(&row[LATITUDE_FIELD])?,
        longitude: parse_coordinate(&row[LONGITUDE_FIELD])?,
    })
}

/// Normalize metadata rows and drop duplicates, keeping the first station seen
/// for each key.
pub fn normalize_stations(rows: &[RawMetadataRow], key: DedupKey) -> Vec<CanonicalStation> {
    let mut seen = HashSet::new();
    let mut stations = Vec::new();
    let mut malformed = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let Some(station) = to_canonical(row) else {
            debug!(row = i, fields = row.len(), "Dropping malformed metadata row");
            malformed += 1;
            continue;
        };
        if seen.insert(key.for_station(&station)) {
            stations.push(station);
        }
    }

    info!(
        rows = rows.len(),
        unique = stations.len(),
        malformed,
        "Normalized metadata rows"
    );
    stations
}
