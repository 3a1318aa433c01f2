//! GeoJSON feature loading
//!
//! Turns GeoJSON documents into [`Feature`] records. Which property holds which
//! facet is described by a [`FieldMapping`]. Malformed values never fail the
//! load: non-string facet properties become empty strings and unusable
//! geometries leave the feature without a location.

use crate::{FacetError, Feature, Result};
use geo::Centroid;
use geojson::{GeoJson, JsonObject, JsonValue};
use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Property keys for each semantic role of a feature
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldMapping {
    pub state: String,
    pub municipality: String,
    pub community: String,
    /// Locality name, used when the community property is blank
    pub locality: String,
    pub people: String,
    /// Record identity; the GeoJSON feature `id` is used when this is absent
    pub record_id: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            state: "NOM_ENT".to_string(),
            municipality: "NOM_MUN".to_string(),
            community: "NOM_COM".to_string(),
            locality: "NOM_LOC".to_string(),
            people: "PUEBLO".to_string(),
            record_id: "ID".to_string(),
        }
    }
}

/// Convert a parsed GeoJSON document into features
///
/// Accepts a `FeatureCollection` or a single `Feature`; bare geometries carry
/// no attributes and are rejected.
pub fn features_from_geojson(geojson: GeoJson, mapping: &FieldMapping) -> Result<Vec<Feature>> {
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection
            .features
            .into_iter()
            .map(|feature| convert_feature(feature, mapping))
            .collect()),
        GeoJson::Feature(feature) => Ok(vec![convert_feature(feature, mapping)]),
        GeoJson::Geometry(_) => Err(FacetError::UnsupportedGeoJson(
            "expected a FeatureCollection or Feature, found a bare geometry".to_string(),
        )),
    }
}

/// Parse features from a GeoJSON string
pub fn load_geojson_str(source: &str, mapping: &FieldMapping) -> Result<Vec<Feature>> {
    let geojson: GeoJson = source.parse()?;
    features_from_geojson(geojson, mapping)
}

/// Parse features from a GeoJSON reader
pub fn load_geojson_reader<R: Read>(reader: R, mapping: &FieldMapping) -> Result<Vec<Feature>> {
    let geojson = GeoJson::from_reader(reader).map_err(geojson::Error::MalformedJson)?;
    features_from_geojson(geojson, mapping)
}

/// Parse features from a GeoJSON file
pub fn load_geojson_file(path: impl AsRef<Path>, mapping: &FieldMapping) -> Result<Vec<Feature>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("loader::load_geojson_file");

    let file = std::fs::File::open(path.as_ref())?;
    let reader = std::io::BufReader::new(file);
    let features = load_geojson_reader(reader, mapping)?;
    tracing::debug!(
        "Loaded {} features from {}",
        features.len(),
        path.as_ref().display()
    );
    Ok(features)
}

/// Load several GeoJSON files in parallel
///
/// Features are concatenated in argument order, so first-occurrence
/// de-duplication downstream does not depend on scheduling.
pub fn load_from_files<P: AsRef<Path> + Send + Sync>(
    paths: Vec<P>,
    mapping: &FieldMapping,
) -> Result<Vec<Feature>> {
    #[cfg(feature = "profiling")]
    profiling::scope!("loader::load_from_files");

    let per_file: Result<Vec<Vec<Feature>>> = paths
        .par_iter()
        .map(|path| load_geojson_file(path, mapping))
        .collect();

    let features: Vec<Feature> = per_file?.into_iter().flatten().collect();
    tracing::info!(
        "Loaded {} features from {} files",
        features.len(),
        paths.len()
    );
    Ok(features)
}

fn convert_feature(feature: geojson::Feature, mapping: &FieldMapping) -> Feature {
    let empty = JsonObject::new();
    let properties = feature.properties.as_ref().unwrap_or(&empty);

    let record_id = id_property(properties, &mapping.record_id).or_else(|| {
        feature.id.as_ref().map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
    });

    Feature {
        record_id,
        state: text_property(properties, &mapping.state),
        municipality: text_property(properties, &mapping.municipality),
        community: text_property(properties, &mapping.community),
        locality: text_property(properties, &mapping.locality),
        people: text_property(properties, &mapping.people),
        location: feature.geometry.and_then(location_of),
    }
}

/// Trimmed string property; anything that is not a string counts as blank
fn text_property(properties: &JsonObject, key: &str) -> String {
    match properties.get(key) {
        Some(JsonValue::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Record id from a string or numeric property
fn id_property(properties: &JsonObject, key: &str) -> Option<String> {
    match properties.get(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Representative point of a geometry: the point itself, or the centroid
fn location_of(geometry: geojson::Geometry) -> Option<geo::Point<f64>> {
    match geo::Geometry::<f64>::try_from(geometry.value) {
        Ok(geo::Geometry::Point(point)) => Some(point),
        Ok(other) => other.centroid(),
        Err(e) => {
            tracing::warn!("Skipping unusable geometry: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureIndex;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-95.03, 16.43] },
                "properties": {
                    "ID": "F1", "NOM_ENT": "Oaxaca ", "NOM_MUN": "Juchitán",
                    "NOM_COM": "X", "PUEBLO": "Zapoteco"
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-95.10, 16.50] },
                "properties": {
                    "ID": 2, "NOM_ENT": "Oaxaca", "NOM_MUN": "Juchitán",
                    "NOM_COM": null, "NOM_LOC": "Y", "PUEBLO": 7
                }
            },
            {
                "type": "Feature",
                "id": "F3",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-93.0, 16.0], [-92.0, 16.0], [-92.0, 17.0], [-93.0, 17.0], [-93.0, 16.0]
                    ]]
                },
                "properties": {
                    "NOM_ENT": "Chiapas", "NOM_MUN": "Z", "NOM_COM": "W", "PUEBLO": "Tzotzil"
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": { "ID": "F4", "NOM_ENT": "Sonora", "PUEBLO": "Seri" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [-99.1, 19.4] },
                "properties": null
            }
        ]
    }"#;

    #[test]
    fn test_load_collection() {
        let features = load_geojson_str(COLLECTION, &FieldMapping::default()).unwrap();
        assert_eq!(features.len(), 5);

        let first = &features[0];
        assert_eq!(first.record_id.as_deref(), Some("F1"));
        assert_eq!(first.state, "Oaxaca");
        assert_eq!(first.location, Some(geo::Point::new(-95.03, 16.43)));
    }

    #[test]
    fn test_non_string_facets_are_blank() {
        let features = load_geojson_str(COLLECTION, &FieldMapping::default()).unwrap();

        let second = &features[1];
        assert_eq!(second.record_id.as_deref(), Some("2"));
        assert_eq!(second.community, "");
        assert_eq!(second.community_or_locality(), "Y");
        assert_eq!(second.people, "");
    }

    #[test]
    fn test_polygon_uses_centroid_and_feature_id() {
        let features = load_geojson_str(COLLECTION, &FieldMapping::default()).unwrap();

        let third = &features[2];
        assert_eq!(third.record_id.as_deref(), Some("F3"));
        let location = third.location.unwrap();
        assert!((location.x() - -92.5).abs() < 1e-9);
        assert!((location.y() - 16.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_geometry_and_properties() {
        let features = load_geojson_str(COLLECTION, &FieldMapping::default()).unwrap();

        assert!(features[3].location.is_none());
        let bare = &features[4];
        assert!(bare.record_id.is_none());
        assert_eq!(bare.state, "");
        assert!(bare.location.is_some());

        // Unlocated records are dropped by the index, facet-less ones are kept
        let index = FeatureIndex::build(features);
        assert_eq!(index.len(), 4);
        assert!(!index.peoples().contains("Seri"));
    }

    #[test]
    fn test_custom_mapping() {
        let source = r#"{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-96.7, 17.1] },
            "properties": { "estado": "Oaxaca", "pueblo": "Mixteco", "clave": "A-1" }
        }"#;
        let mapping = FieldMapping {
            state: "estado".to_string(),
            people: "pueblo".to_string(),
            record_id: "clave".to_string(),
            ..Default::default()
        };

        let features = load_geojson_str(source, &mapping).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].state, "Oaxaca");
        assert_eq!(features[0].people, "Mixteco");
        assert_eq!(features[0].record_id.as_deref(), Some("A-1"));
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let source = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        let result = load_geojson_str(source, &FieldMapping::default());
        assert!(matches!(result, Err(FacetError::UnsupportedGeoJson(_))));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = load_geojson_str("{ not json", &FieldMapping::default());
        assert!(matches!(result, Err(FacetError::GeoJson(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_from_files(
            vec!["/nonexistent/pueblos.geojson"],
            &FieldMapping::default(),
        );
        assert!(matches!(result, Err(FacetError::Io(_))));
    }

    /// Write a fixture under the temp dir, unique per process and test
    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pueblos-loader-{}-{name}.geojson",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn point_feature(id: &str, state: &str, people: &str) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "geometry": {{ "type": "Point", "coordinates": [-96.0, 17.0] }},
                "properties": {{ "ID": "{id}", "NOM_ENT": "{state}", "PUEBLO": "{people}" }}
            }}"#
        )
    }

    #[test]
    fn test_load_reader() {
        let reader = std::io::Cursor::new(COLLECTION.as_bytes());
        let features = load_geojson_reader(reader, &FieldMapping::default()).unwrap();
        assert_eq!(features.len(), 5);
        assert_eq!(features[2].record_id.as_deref(), Some("F3"));
    }

    #[test]
    fn test_load_from_files_keeps_argument_order() {
        let first = write_fixture(
            "order-a",
            &format!(
                r#"{{ "type": "FeatureCollection", "features": [{}, {}] }}"#,
                point_feature("A1", "Oaxaca", "Zapoteco"),
                point_feature("S1", "Oaxaca", "Mixe"),
            ),
        );
        let second = write_fixture("order-b", &point_feature("S1", "Chiapas", "Tzotzil"));

        let features =
            load_from_files(vec![first.clone(), second.clone()], &FieldMapping::default())
                .unwrap();
        let ids: Vec<_> = features
            .iter()
            .filter_map(|f| f.record_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["A1", "S1", "S1"]);

        // The shared id resolves to the record from the first file
        let index = FeatureIndex::build(features);
        assert_eq!(index.len(), 2);
        assert_eq!(index.features()[1].state, "Oaxaca");
        assert!(!index.states().contains("Chiapas"));

        let single = load_geojson_file(&second, &FieldMapping::default()).unwrap();
        assert_eq!(single[0].people, "Tzotzil");

        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }

    #[test]
    fn test_malformed_file_is_geojson_error() {
        let path = write_fixture("malformed", "{ \"type\": \"FeatureCollection\", ");
        let result = load_from_files(vec![path.clone()], &FieldMapping::default());
        assert!(matches!(result, Err(FacetError::GeoJson(_))));
        std::fs::remove_file(path).unwrap();
    }
}
