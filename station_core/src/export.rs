//! Read-only export of the visit history.
//!
//! Produces GeoJSON for map viewers and CSV for spreadsheets. Rendering the
//! map itself is left to whatever opens the file.

use crate::{Result, VisitRecord};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::path::Path;

/// Export formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Csv => "csv",
        }
    }
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    order: usize,
    index: usize,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    address: &'a str,
}

fn maps_link(record: &VisitRecord) -> String {
    format!(
        "https://google.com/maps/?q={},{}",
        record.latitude, record.longitude
    )
}

/// Build a GeoJSON FeatureCollection, one point per visit in visit order
pub fn to_geojson(visited: &[VisitRecord], exported_at: DateTime<Utc>) -> Value {
    let features: Vec<Value> = visited
        .iter()
        .enumerate()
        .map(|(order, record)| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    // GeoJSON positions are [longitude, latitude]
                    "coordinates": [record.longitude, record.latitude],
                },
                "properties": {
                    "order": order + 1,
                    "index": record.station_index,
                    "name": record.name,
                    "address": record.address,
                    "maps_url": maps_link(record),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "properties": {
            "exported_at": exported_at.to_rfc3339(),
            "visits": visited.len(),
        },
        "features": features,
    })
}

/// Write the history as GeoJSON
pub fn write_geojson(path: &Path, visited: &[VisitRecord]) -> Result<()> {
    ensure_parent_dir(path)?;
    let document = to_geojson(visited, Utc::now());
    std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
    tracing::info!("Exported {} visits to {:?}", visited.len(), path);
    Ok(())
}

/// Write the history as CSV with a header row
pub fn write_csv(path: &Path, visited: &[VisitRecord]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;

    for (order, record) in visited.iter().enumerate() {
        writer.serialize(CsvRow {
            order: order + 1,
            index: record.station_index,
            name: &record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            address: record.address.as_deref().unwrap_or(""),
        })?;
    }

    writer.flush()?;
    tracing::info!("Exported {} visits to {:?}", visited.len(), path);
    Ok(())
}

/// Write the history in the given format
pub fn export(path: &Path, visited: &[VisitRecord], format: ExportFormat) -> Result<()> {
    match format {
        ExportFormat::GeoJson => write_geojson(path, visited),
        ExportFormat::Csv => write_csv(path, visited),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visits() -> Vec<VisitRecord> {
        vec![
            VisitRecord {
                station_index: 33,
                name: "台北站".into(),
                latitude: 25.0479,
                longitude: 121.5171,
                address: Some("台北市中正區".into()),
            },
            VisitRecord {
                station_index: 40,
                name: "桃園站".into(),
                latitude: 24.9892,
                longitude: 121.3136,
                address: None,
            },
        ]
    }

    #[test]
    fn test_geojson_structure() {
        let doc = to_geojson(&visits(), Utc::now());

        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["properties"]["visits"], 2);
        let features = doc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);

        let first = &features[0];
        assert_eq!(first["geometry"]["coordinates"][0], 121.5171);
        assert_eq!(first["geometry"]["coordinates"][1], 25.0479);
        assert_eq!(first["properties"]["name"], "台北站");
        assert_eq!(first["properties"]["order"], 1);
        assert_eq!(
            first["properties"]["maps_url"],
            "https://google.com/maps/?q=25.0479,121.5171"
        );
        assert!(features[1]["properties"]["address"].is_null());
    }

    #[test]
    fn test_empty_history_exports_empty_collection() {
        let doc = to_geojson(&[], Utc::now());
        assert!(doc["features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_write_geojson_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("history.geojson");

        write_geojson(&path, &visits()).unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["features"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_csv_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");

        export(&path, &visits(), ExportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["order", "index", "name", "latitude", "longitude", "address"]
        );
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][2], "桃園站");
        assert_eq!(&rows[1][5], "");
    }
}
