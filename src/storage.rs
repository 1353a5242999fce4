use crate::error::Result;
use crate::types::StationRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Write the merged dataset as a JSON array, creating parent directories.
pub fn write_stations(path: &Path, stations: &[StationRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut output = serde_json::to_string_pretty(stations)?;
    output.push('\n');
    fs::write(path, output)?;
    Ok(())
}

/// Read a persisted dataset without interpreting its entries.
pub fn read_stations(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalStation, EnrichedStation};
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("eea-stations.json");
        let records = vec![
            StationRecord::Enriched(EnrichedStation {
                station: CanonicalStation {
                    station_id: "AT1".into(),
                    latitude: "47.123456".into(),
                    longitude: "14.123456".into(),
                },
                location: "Graz".into(),
                city: "Styria".into(),
                bounds: vec![14.0, 47.0, 14.5, 47.5],
            }),
            StationRecord::Existing(json!("DEBY001")),
        ];

        write_stations(&path, &records).unwrap();
        let read = read_stations(&path).unwrap();

        assert_eq!(read.len(), 2);
        assert_eq!(read[0]["stationId"], "AT1");
        assert_eq!(read[0]["bounds"], json!([14.0, 47.0, 14.5, 47.5]));
        assert_eq!(read[1], json!("DEBY001"));
    }

    #[test]
    fn test_read_rejects_non_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"stationId": "AT1"}"#).unwrap();
        assert!(read_stations(&path).is_err());
    }
}
