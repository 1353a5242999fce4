use crate::pipeline::ingestion::existing::ExistingStationSet;
use crate::types::{EnrichedStation, StationRecord};
use tracing::info;

/// Append-only merge: new stations first, then every existing entry as-is.
///
/// No duplicate resolution happens here; the output length is always
/// `new.len() + existing.len()`.
pub fn merge_stations(new: Vec<EnrichedStation>, existing: ExistingStationSet) -> Vec<StationRecord> {
    let (new_count, existing_count) = (new.len(), existing.len());
    let mut merged = Vec::with_capacity(new_count + existing_count);
    merged.extend(new.into_iter().map(StationRecord::Enriched));
    merged.extend(existing.into_records().into_iter().map(StationRecord::Existing));

    info!(new = new_count, existing = existing_count, total = merged.len(), "Merged station datasets");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CanonicalStation;
    use serde_json::json;

    fn enriched(id: &str, lat: &str) -> EnrichedStation {
        EnrichedStation {
            station: CanonicalStation {
                station_id: id.into(),
                latitude: lat.into(),
                longitude: "1.000000".into(),
            },
            location: "unused".into(),
            city: "unused".into(),
            bounds: Vec::new(),
        }
    }

    #[test]
    fn test_length_is_sum_of_inputs() {
        let existing = ExistingStationSet::new(vec![
            json!({"stationId": "OLD1"}),
            json!({"stationId": "OLD2"}),
            json!("OLD3"),
        ]);
        let merged = merge_stations(vec![enriched("NEW1", "1.000000"), enriched("NEW2", "2.000000")], existing);
        assert_eq!(merged.len(), 5);
        assert!(matches!(&merged[0], StationRecord::Enriched(s) if s.station.station_id == "NEW1"));
        assert_eq!(merged[4], StationRecord::Existing(json!("OLD3")));
    }

    #[test]
    fn test_duplicates_are_retained() {
        let existing = ExistingStationSet::new(vec![json!({"stationId": "AT1", "latitude": "1.000000"})]);
        let merged = merge_stations(vec![enriched("AT1", "1.000000")], existing);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_records_serialize_flat() {
        let merged = merge_stations(
            vec![enriched("AT1", "1.000000")],
            ExistingStationSet::new(vec![json!({"stationId": "OLD", "extra": true})]),
        );
        let value = serde_json::to_value(&merged).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "stationId": "AT1",
                    "latitude": "1.000000",
                    "longitude": "1.000000",
                    "location": "unused",
                    "city": "unused",
                    "bounds": []
                },
                {"stationId": "OLD", "extra": true}
            ])
        );
    }
}
