//! CSV station source.
//!
//! Reads the tabular station dataset into raw records. Fields sit at fixed
//! column positions given by [`CatalogConfig`]; extra columns are ignored.

use crate::config::CatalogConfig;
use crate::{Error, RawStation, Result, StationCatalog};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Load a station catalog from a CSV file
pub fn load_catalog(path: &Path, layout: &CatalogConfig) -> Result<StationCatalog> {
    let file = std::fs::File::open(path)?;
    tracing::debug!("Reading stations from {:?}", path);
    load_catalog_from_reader(file, layout)
}

/// Load a station catalog from any CSV reader
pub fn load_catalog_from_reader<R: Read>(reader: R, layout: &CatalogConfig) -> Result<StationCatalog> {
    let rows = read_raw_stations(reader, layout)?;
    StationCatalog::from_records(rows)
}

/// Read raw station records without parsing coordinates
pub fn read_raw_stations<R: Read>(reader: R, layout: &CatalogConfig) -> Result<Vec<RawStation>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(layout.has_headers)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(raw_station(row, &record, layout)?);
    }

    Ok(rows)
}

fn raw_station(row: usize, record: &StringRecord, layout: &CatalogConfig) -> Result<RawStation> {
    let required = |column: usize, field: &str| {
        record
            .get(column)
            .map(str::to_string)
            .ok_or_else(|| Error::MalformedStation {
                row,
                reason: format!("missing {} (column {})", field, column),
            })
    };

    Ok(RawStation {
        name: required(layout.name_column, "name")?,
        latitude: required(layout.latitude_column, "latitude")?,
        longitude: required(layout.longitude_column, "longitude")?,
        address: record.get(layout.address_column).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS: &str = "\
1001,TPE,台北站,Taipei,台北市中正區,02-1,25.0479,121.5171
1002,BQA,板橋站,Banqiao,新北市板橋區,02-2,25.0143,121.4638
1003,TYC,桃園站,Taoyuan,桃園市桃園區,03-1,24.9892,121.3136
";

    #[test]
    fn test_reads_fixed_columns() {
        let catalog =
            load_catalog_from_reader(STATIONS.as_bytes(), &CatalogConfig::default()).unwrap();

        assert_eq!(catalog.len(), 3);
        let taipei = catalog.get(0).unwrap();
        assert_eq!(taipei.name, "台北站");
        assert_eq!(taipei.latitude, 25.0479);
        assert_eq!(taipei.longitude, 121.5171);
        assert_eq!(taipei.address.as_deref(), Some("台北市中正區"));
        assert_eq!(catalog.get(2).unwrap().name, "桃園站");
    }

    #[test]
    fn test_header_row_skipped_when_configured() {
        let with_header = format!("id,code,name,en,address,tel,lat,lon\n{}", STATIONS);
        let layout = CatalogConfig {
            has_headers: true,
            ..CatalogConfig::default()
        };

        let catalog = load_catalog_from_reader(with_header.as_bytes(), &layout).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(0).unwrap().name, "台北站");
    }

    #[test]
    fn test_header_row_is_malformed_without_flag() {
        let with_header = format!("id,code,name,en,address,tel,lat,lon\n{}", STATIONS);
        let result = load_catalog_from_reader(with_header.as_bytes(), &CatalogConfig::default());
        assert!(matches!(result, Err(Error::MalformedStation { row: 0, .. })));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let data = "1001,TPE,台北站,Taipei,台北市中正區,02-1,25.0479,121.5171\n1002,BQA,板橋站\n";
        let result = load_catalog_from_reader(data.as_bytes(), &CatalogConfig::default());
        assert!(matches!(result, Err(Error::MalformedStation { row: 1, .. })));
    }

    #[test]
    fn test_missing_address_column_is_allowed() {
        let layout = CatalogConfig {
            name_column: 0,
            latitude_column: 1,
            longitude_column: 2,
            address_column: 3,
            ..CatalogConfig::default()
        };
        let catalog =
            load_catalog_from_reader("A站,25.0,121.5\n".as_bytes(), &layout).unwrap();
        assert_eq!(catalog.get(0).unwrap().address, None);
    }

    #[test]
    fn test_load_catalog_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("station.csv");
        std::fs::write(&path, STATIONS).unwrap();

        let catalog = load_catalog(&path, &CatalogConfig::default()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_catalog(&temp_dir.path().join("nope.csv"), &CatalogConfig::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
