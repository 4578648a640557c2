//! Reading ground polygons as `(lon, lat)` vertex lists.

use std::fs;
use std::path::Path;

use satgeo_core::Pt2;
use serde_json::Value;

use crate::PolygonError;

/// Outer ring of a GeoJSON polygon.
///
/// Accepts a `FeatureCollection` (first feature), a `Feature` (its geometry)
/// or a bare `Polygon`.
pub fn polygon_from_geojson(value: &Value) -> Result<Vec<Pt2>, PolygonError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| PolygonError::UnsupportedType("<missing>".to_string()))?;

    match kind {
        "FeatureCollection" => {
            let first = value
                .get("features")
                .and_then(Value::as_array)
                .and_then(|f| f.first())
                .ok_or(PolygonError::MissingCoordinates)?;
            polygon_from_geojson(first)
        }
        "Feature" => {
            let geometry = value.get("geometry").ok_or(PolygonError::MissingCoordinates)?;
            polygon_from_geojson(geometry)
        }
        "Polygon" => {
            let ring = value
                .get("coordinates")
                .and_then(Value::as_array)
                .and_then(|rings| rings.first())
                .and_then(Value::as_array)
                .ok_or(PolygonError::MissingCoordinates)?;
            let vertices = ring.iter().map(json_vertex).collect::<Result<Vec<_>, _>>()?;
            if vertices.is_empty() {
                return Err(PolygonError::MissingCoordinates);
            }
            Ok(vertices)
        }
        other => Err(PolygonError::UnsupportedType(other.to_string())),
    }
}

fn json_vertex(v: &Value) -> Result<Pt2, PolygonError> {
    let pos = v
        .as_array()
        .filter(|a| a.len() >= 2)
        .ok_or_else(|| PolygonError::InvalidCoordinate(v.to_string()))?;
    match (pos[0].as_f64(), pos[1].as_f64()) {
        (Some(lon), Some(lat)) => Ok(Pt2::new(lon, lat)),
        _ => Err(PolygonError::InvalidCoordinate(v.to_string())),
    }
}

pub fn polygon_from_geojson_str(s: &str) -> Result<Vec<Pt2>, PolygonError> {
    let value: Value = serde_json::from_str(s)?;
    polygon_from_geojson(&value)
}

/// Vertices of the first `<coordinates>` element of a KML document.
///
/// Tuples are `lon,lat[,alt]` separated by whitespace; altitudes are ignored.
pub fn polygon_from_kml(s: &str) -> Result<Vec<Pt2>, PolygonError> {
    let open = find_open_tag(s, "coordinates").ok_or(PolygonError::MissingCoordinates)?;
    let start = s[open..]
        .find('>')
        .map(|i| open + i + 1)
        .ok_or(PolygonError::MissingCoordinates)?;
    let end = s[start..]
        .find("</coordinates>")
        .map(|i| start + i)
        .ok_or(PolygonError::MissingCoordinates)?;

    let vertices = s[start..end]
        .split_whitespace()
        .map(|tuple| {
            let mut it = tuple.split(',').map(|c| c.trim().parse::<f64>());
            match (it.next(), it.next()) {
                (Some(Ok(lon)), Some(Ok(lat))) => Ok(Pt2::new(lon, lat)),
                _ => Err(PolygonError::InvalidCoordinate(tuple.to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if vertices.is_empty() {
        return Err(PolygonError::MissingCoordinates);
    }
    Ok(vertices)
}

/// Byte offset of the first `<name>` or `<name attr..>` tag.
fn find_open_tag(s: &str, name: &str) -> Option<usize> {
    let pattern = format!("<{name}");
    let mut from = 0;
    while let Some(i) = s[from..].find(&pattern) {
        let at = from + i;
        let next = s[at + pattern.len()..].chars().next();
        if matches!(next, Some(c) if c == '>' || c.is_whitespace()) {
            return Some(at);
        }
        from = at + pattern.len();
    }
    None
}

/// Read a polygon from a `.json`/`.geojson` or `.kml` file.
pub fn load_polygon(path: &Path) -> Result<Vec<Pt2>, PolygonError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" | "geojson" => polygon_from_geojson_str(&fs::read_to_string(path)?),
        "kml" => polygon_from_kml(&fs::read_to_string(path)?),
        _ => Err(PolygonError::UnknownFormat(path.display().to_string())),
    }
}
