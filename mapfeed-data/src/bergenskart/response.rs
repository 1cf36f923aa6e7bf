//! GeoJSON payload returned by a WFS `GetFeature` request with
//! `outputFormat=application/json`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level GeoJSON feature collection.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    /// Features in server order.
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

/// One GeoJSON feature.
#[derive(Debug, Deserialize)]
pub struct GeoFeature {
    /// Feature identifier assigned by the map server.
    #[serde(default)]
    pub id: Option<Value>,
    /// Property values keyed by name; `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
    /// Feature geometry; GeoJSON allows `null`.
    pub geometry: Option<GeoGeometry>,
}

/// GeoJSON geometry restricted to the polygonal types districts use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum GeoGeometry {
    /// Exterior ring followed by holes.
    Polygon {
        /// Rings of `[x, y]` positions.
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygons, each a list of rings.
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    /// Any other GeoJSON geometry type.
    #[serde(other)]
    Unsupported,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Map<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_mixed_geometries() {
        let json = r#"{
            "type": "FeatureCollection",
            "totalFeatures": 3,
            "features": [
                {"type": "Feature", "id": "skolekrets.1",
                 "properties": {"navn": "Nordnes"},
                 "geometry": {"type": "Polygon", "coordinates": [[[5.3, 60.39], [5.31, 60.39], [5.31, 60.4], [5.3, 60.39]]]}},
                {"type": "Feature", "id": "skolekrets.2",
                 "properties": {"navn": "Sandviken"},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[[[5.3, 60.4], [5.31, 60.4], [5.31, 60.41], [5.3, 60.4]]]]}},
                {"type": "Feature", "properties": {"navn": "Punkt"},
                 "geometry": {"type": "Point", "coordinates": [5.3, 60.4]}}
            ]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(json).expect("should deserialise");

        let kinds: Vec<_> = collection
            .features
            .iter()
            .map(|feature| match &feature.geometry {
                Some(GeoGeometry::Polygon { .. }) => "polygon",
                Some(GeoGeometry::MultiPolygon { .. }) => "multipolygon",
                Some(GeoGeometry::Unsupported) => "unsupported",
                None => "none",
            })
            .collect();
        assert_eq!(kinds, vec!["polygon", "multipolygon", "unsupported"]);
    }

    #[test]
    fn deserialise_null_geometry() {
        let json = r#"{"features": [{"type": "Feature", "properties": {}, "geometry": null}]}"#;

        let collection: FeatureCollection = serde_json::from_str(json).expect("should deserialise");

        assert!(
            collection
                .features
                .first()
                .is_some_and(|feature| feature.geometry.is_none())
        );
    }

    #[test]
    fn deserialise_null_properties() {
        let json = r#"{"features": [
            {"type": "Feature", "properties": null, "geometry": null},
            {"type": "Feature", "geometry": null}
        ]}"#;

        let collection: FeatureCollection = serde_json::from_str(json).expect("should deserialise");

        assert_eq!(collection.features.len(), 2);
        assert!(
            collection
                .features
                .iter()
                .all(|feature| feature.properties.is_empty())
        );
    }
}
