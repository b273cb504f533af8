//! Projection of tabular sample rows into GeoJSON-shaped point features.
//!
//! Samples sharing a coordinate are fanned out on a spiral so they stay
//! individually pickable. The first sample at a coordinate keeps its true
//! position; later ones are offset in input order, so reordering the input
//! changes which sample stays put. Callers that re-render must keep the order.

use crate::color::distance_to_color;
use crate::config::Number;
use crate::search::{Distance, DistanceMatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

/// Angular step between successive coincident samples, in radians.
pub const JITTER_ANGLE: Number = 2.4;
/// Spiral radius multiplier, in degrees.
pub const JITTER_RADIUS: Number = 0.01;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SampleRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [Number; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoFeature {
    pub id: Value,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl GeoFeature {
    /// Rendered `(longitude, latitude)`, including any jitter.
    pub fn position(&self) -> (Number, Number) {
        let Geometry::Point { coordinates } = &self.geometry;
        (coordinates[0], coordinates[1])
    }

    /// Pre-jitter `(longitude, latitude)`.
    pub fn original_position(&self) -> Option<(Number, Number)> {
        let lng = self.properties.get("original_longitude")?.as_f64()?;
        let lat = self.properties.get("original_latitude")?.as_f64()?;
        Some((lng, lat))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<GeoFeature>,
}

/// Reads a coordinate that may be a JSON number or a string using either `.`
/// or `,` as the decimal separator.
pub fn parse_locale_number(value: &Value) -> Option<Number> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.replace(',', ".").parse::<Number>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

pub fn project(records: &[SampleRecord]) -> FeatureCollection {
    project_counted(records).0
}

/// Like [`project`], also returning how many records were dropped for
/// missing or unreadable coordinates.
pub fn project_counted(records: &[SampleRecord]) -> (FeatureCollection, usize) {
    let mut seen: HashMap<(i64, i64), usize> = HashMap::new();
    let mut features = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        let coordinates = record
            .latitude
            .as_ref()
            .and_then(parse_locale_number)
            .zip(record.longitude.as_ref().and_then(parse_locale_number));
        let Some((latitude, longitude)) = coordinates else {
            debug!(id = %record.id, "dropping sample without usable coordinates");
            dropped += 1;
            continue;
        };

        let occurrence = seen
            .entry(coordinate_key(latitude, longitude))
            .or_insert(0);
        let (jittered_lng, jittered_lat) = jitter(longitude, latitude, *occurrence);
        *occurrence += 1;

        features.push(GeoFeature {
            id: record.id.clone(),
            geometry: Geometry::Point {
                coordinates: [jittered_lng, jittered_lat],
            },
            properties: feature_properties(record, latitude, longitude),
        });
    }

    if dropped > 0 {
        info!(
            dropped,
            kept = features.len(),
            "dropped samples without coordinates"
        );
    }
    (FeatureCollection { features }, dropped)
}

/// Coordinates in units of 1e-5 degrees. Integer keys make `-0.0` and `0.0` the same site.
fn coordinate_key(latitude: Number, longitude: Number) -> (i64, i64) {
    let scaled = |degrees: Number| (degrees * 1e5).round() as i64;
    (scaled(latitude), scaled(longitude))
}

/// Offset for the `n`-th (zero-based) sample at a shared coordinate.
pub fn jitter(longitude: Number, latitude: Number, n: usize) -> (Number, Number) {
    if n == 0 {
        return (longitude, latitude);
    }
    let n = n as Number;
    let angle = n * JITTER_ANGLE;
    let radius = JITTER_RADIUS * n.sqrt();
    (
        longitude + radius * angle.cos(),
        latitude + radius * angle.sin(),
    )
}

fn feature_properties(
    record: &SampleRecord,
    latitude: Number,
    longitude: Number,
) -> Map<String, Value> {
    let mut properties = record.extra.clone();
    properties.insert("id".to_string(), record.id.clone());
    if let Some(raw) = &record.latitude {
        properties.insert("latitude".to_string(), raw.clone());
    }
    if let Some(raw) = &record.longitude {
        properties.insert("longitude".to_string(), raw.clone());
    }
    properties.insert("original_latitude".to_string(), Value::from(latitude));
    properties.insert("original_longitude".to_string(), Value::from(longitude));
    properties
}

/// Attaches `distance` and `color` properties to every feature whose `key`
/// property equals a match label. Numeric properties match labels that parse
/// to the same number, so `1.0` matches `"1"`. Returns how many features were annotated.
pub fn annotate_distances(
    collection: &mut FeatureCollection,
    matches: &[DistanceMatch],
    key: &str,
    scale_max: Number,
) -> usize {
    let mut by_label: HashMap<&str, Distance> = HashMap::with_capacity(matches.len());
    let mut by_number: Vec<(Number, Distance)> = Vec::new();
    for m in matches {
        by_label.entry(m.label.as_str()).or_insert(m.distance);
        if let Ok(number) = m.label.trim().parse::<Number>() {
            by_number.push((number, m.distance));
        }
    }

    let mut annotated = 0;
    for feature in &mut collection.features {
        let distance = match feature.properties.get(key) {
            Some(Value::String(label)) => by_label.get(label.as_str()).copied(),
            Some(Value::Number(n)) => n.as_f64().and_then(|n| {
                by_number
                    .iter()
                    .find(|(number, _)| *number == n)
                    .map(|(_, distance)| *distance)
            }),
            _ => None,
        };
        let Some(distance) = distance else {
            continue;
        };
        let color = distance_to_color(distance.value(), scale_max);
        feature
            .properties
            .insert("distance".to_string(), Value::String(distance.to_string()));
        feature
            .properties
            .insert("color".to_string(), Value::String(color.to_string()));
        annotated += 1;
    }
    annotated
}
