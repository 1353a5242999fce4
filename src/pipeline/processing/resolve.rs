use crate::constants::UNUSED;
use crate::types::{CanonicalStation, EnrichedStation, GeocodeFeature, GeocodeResponse, PlaceProperties};
use serde_json::Value;

/// A feature property the resolver can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceField {
    Locality,
    LocalAdmin,
    Neighbourhood,
    County,
    Name,
    Region,
    MacroRegion,
    MacroCounty,
}

impl PlaceField {
    fn get(self, properties: &PlaceProperties) -> Option<&str> {
        let value = match self {
            PlaceField::Locality => &properties.locality,
            PlaceField::LocalAdmin => &properties.localadmin,
            PlaceField::Neighbourhood => &properties.neighbourhood,
            PlaceField::County => &properties.county,
            PlaceField::Name => &properties.name,
            PlaceField::Region => &properties.region,
            PlaceField::MacroRegion => &properties.macroregion,
            PlaceField::MacroCounty => &properties.macrocounty,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

/// Most specific first.
pub const LOCATION_FALLBACK: &[PlaceField] = &[
    PlaceField::Locality,
    PlaceField::LocalAdmin,
    PlaceField::Neighbourhood,
    PlaceField::County,
    PlaceField::Name,
];

pub const CITY_FALLBACK: &[PlaceField] = &[
    PlaceField::Region,
    PlaceField::MacroRegion,
    PlaceField::MacroCounty,
];

/// The first populated field in `priority`, or the `"unused"` sentinel.
pub fn first_present(properties: &PlaceProperties, priority: &[PlaceField]) -> String {
    priority
        .iter()
        .find_map(|field| field.get(properties))
        .unwrap_or(UNUSED)
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub location: String,
    pub city: String,
    pub bounds: Vec<f64>,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            location: UNUSED.to_string(),
            city: UNUSED.to_string(),
            bounds: Vec::new(),
        }
    }
}

/// The bbox as four numbers, or empty when it has any other shape.
fn bbox_bounds(bbox: Option<&[Value]>) -> Vec<f64> {
    match bbox {
        Some(values) if values.len() == 4 => values
            .iter()
            .map(Value::as_f64)
            .collect::<Option<Vec<f64>>>()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub fn resolve_feature(feature: &GeocodeFeature) -> Resolution {
    let bounds = bbox_bounds(feature.bbox.as_deref());
    Resolution {
        location: first_present(&feature.properties, LOCATION_FALLBACK),
        city: first_present(&feature.properties, CITY_FALLBACK),
        bounds,
    }
}

/// Build the enriched record for `station`.
///
/// Without a response, or with an empty feature list, the station keeps its
/// id and coordinates and gets the unenriched defaults.
pub fn enrich_station(station: CanonicalStation, response: Option<&GeocodeResponse>) -> EnrichedStation {
    let resolution = response
        .and_then(|r| r.features.first())
        .map(resolve_feature)
        .unwrap_or_default();
    EnrichedStation {
        station,
        location: resolution.location,
        city: resolution.city,
        bounds: resolution.bounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GeocodeResponse {
        serde_json::from_value(value).unwrap()
    }

    fn station() -> CanonicalStation {
        CanonicalStation {
            station_id: "AT1".into(),
            latitude: "47.123456".into(),
            longitude: "14.123456".into(),
        }
    }

    #[test]
    fn test_neighbourhood_used_when_more_specific_fields_missing() {
        let r = response(json!({
            "features": [{"properties": {"neighbourhood": "X", "county": "Y"}}]
        }));
        let resolved = resolve_feature(&r.features[0]);
        assert_eq!(resolved.location, "X");
        assert_eq!(resolved.city, UNUSED);
        assert!(resolved.bounds.is_empty());
    }

    #[test]
    fn test_location_priority_order() {
        let props = PlaceProperties {
            locality: Some("Graz".into()),
            localadmin: Some("Admin".into()),
            name: Some("Name".into()),
            ..Default::default()
        };
        assert_eq!(first_present(&props, LOCATION_FALLBACK), "Graz");

        let props = PlaceProperties {
            name: Some("Somewhere".into()),
            ..Default::default()
        };
        assert_eq!(first_present(&props, LOCATION_FALLBACK), "Somewhere");
    }

    #[test]
    fn test_city_priority_order() {
        let props = PlaceProperties {
            macroregion: Some("Macro".into()),
            macrocounty: Some("County".into()),
            ..Default::default()
        };
        assert_eq!(first_present(&props, CITY_FALLBACK), "Macro");

        let props = PlaceProperties {
            macrocounty: Some("County".into()),
            ..Default::default()
        };
        assert_eq!(first_present(&props, CITY_FALLBACK), "County");
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let props = PlaceProperties {
            locality: Some(String::new()),
            county: Some("Styria County".into()),
            region: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(first_present(&props, LOCATION_FALLBACK), "Styria County");
        assert_eq!(first_present(&props, CITY_FALLBACK), UNUSED);
    }

    #[test]
    fn test_bbox_must_have_four_numbers() {
        let r = response(json!({
            "features": [
                {"properties": {}, "bbox": [14.0, 47.0, 14.5, 47.5]},
                {"properties": {}, "bbox": [14.0, 47.0]}
            ]
        }));
        assert_eq!(resolve_feature(&r.features[0]).bounds, vec![14.0, 47.0, 14.5, 47.5]);
        assert!(resolve_feature(&r.features[1]).bounds.is_empty());
    }

    #[test]
    fn test_malformed_bbox_keeps_place_names() {
        let r = response(json!({
            "features": [{
                "properties": {"locality": "Graz", "region": "Styria"},
                "bbox": [14.0, null, "14.5", 47.5]
            }]
        }));
        let enriched = enrich_station(station(), Some(&r));
        assert_eq!(enriched.location, "Graz");
        assert_eq!(enriched.city, "Styria");
        assert!(enriched.bounds.is_empty());
    }

    #[test]
    fn test_no_features_keeps_station_and_defaults() {
        let r = response(json!({"features": []}));
        let enriched = enrich_station(station(), Some(&r));

        assert_eq!(enriched.station, station());
        assert_eq!(enriched.location, "unused");
        assert_eq!(enriched.city, "unused");
        assert!(enriched.bounds.is_empty());
    }

    #[test]
    fn test_missing_response_keeps_station_and_defaults() {
        let enriched = enrich_station(station(), None);
        assert_eq!(enriched.station, station());
        assert_eq!(enriched.location, UNUSED);
        assert_eq!(enriched.city, UNUSED);
    }

    #[test]
    fn test_first_feature_wins() {
        let r = response(json!({
            "features": [
                {"properties": {"locality": "Graz", "region": "Styria"}, "bbox": [14.0, 47.0, 14.5, 47.5]},
                {"properties": {"locality": "Wien", "region": "Wien"}}
            ]
        }));
        let enriched = enrich_station(station(), Some(&r));
        assert_eq!(enriched.location, "Graz");
        assert_eq!(enriched.city, "Styria");
        assert_eq!(enriched.bounds, vec![14.0, 47.0, 14.5, 47.5]);
    }
}
