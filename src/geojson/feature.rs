use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::geojson::Geometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureCollectionTag {
    FeatureCollection,
}

/// GeoJSON feature.
///
/// Members other than `type`, `id`, `geometry`, `properties` and `bbox` are
/// kept in `foreign_members` so a feature survives re-serialization intact.
/// `serde_json::Map` is key-ordered, which keeps the output byte-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>) -> Self {
        Self {
            kind: FeatureTag::Feature,
            id: None,
            geometry,
            properties: None,
            bbox: None,
            foreign_members: Map::new(),
        }
    }

    /// Set a property, creating the property map if needed.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }
}

/// GeoJSON feature collection; feature order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    kind: FeatureCollectionTag,
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: FeatureCollectionTag::FeatureCollection,
            features,
            bbox: None,
        }
    }

    /// Parse a GeoJSON FeatureCollection document.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Compact, deterministic serialization used for storage and checksums.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 7, "geometry": {"type": "Point", "coordinates": [1, 2]},
             "properties": {"name": "well", "amenity": "water"}},
            {"type": "Feature", "geometry": null, "properties": null, "source": "survey"}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let fc = FeatureCollection::parse(SAMPLE).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].id, Some(Value::from(7)));
        assert_eq!(fc.features[0].geometry, Some(Geometry::point(1.0, 2.0)));
        assert_eq!(fc.features[0].property("name"), Some(&Value::from("well")));
        assert!(fc.features[1].geometry.is_none());
        assert_eq!(fc.features[1].foreign_members.get("source"), Some(&Value::from("survey")));
    }

    #[test]
    fn test_rejects_wrong_document_type() {
        let err = FeatureCollection::parse(r#"{"type": "Feature", "features": []}"#);
        assert!(err.is_err());
        assert!(FeatureCollection::parse("not json").is_err());
        assert!(FeatureCollection::parse(r#"{"type": "FeatureCollection"}"#).is_err());
    }

    #[test]
    fn test_serialization_is_stable() {
        let fc = FeatureCollection::parse(SAMPLE).unwrap();
        let first = fc.to_json().unwrap();
        let reparsed = FeatureCollection::parse(&first).unwrap();
        assert_eq!(first, reparsed.to_json().unwrap());
        // Property keys come out sorted regardless of input order
        assert!(first.find("\"amenity\"").unwrap() < first.find("\"name\"").unwrap());
    }

    #[test]
    fn test_empty_collection_json() {
        let json = FeatureCollection::new(Vec::new()).to_json().unwrap();
        assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
    }

    #[test]
    fn test_with_property() {
        let f = Feature::new(Some(Geometry::point(0.0, 0.0))).with_property("k", "v");
        assert_eq!(f.property("k"), Some(&Value::from("v")));
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0.0,0.0]},"properties":{"k":"v"}}"#
        );
    }
}
