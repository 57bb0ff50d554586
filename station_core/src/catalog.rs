//! The station catalog.
//!
//! Stations are kept in source order. A station's index is its position in
//! that order and is the only identity the engine uses.

use crate::history::SEPARATOR;
use crate::types::*;
use crate::{Error, Result};

/// Ordered, read-only list of stations
#[derive(Clone, Debug, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    /// Build a catalog from raw source records
    ///
    /// Index = position in `rows`. The first malformed row rejects the whole
    /// load, since skipping it would shift every later index.
    pub fn from_records<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawStation>,
    {
        let stations = rows
            .into_iter()
            .enumerate()
            .map(|(index, raw)| parse_station(index, raw))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Loaded catalog with {} stations", stations.len());
        Ok(Self { stations })
    }

    /// Get a station by index
    pub fn get(&self, index: usize) -> Result<&Station> {
        self.stations.get(index).ok_or(Error::UnknownStation {
            index,
            len: self.stations.len(),
        })
    }

    /// Exact match against the display name, first in catalog order
    pub fn find_by_name(&self, display_name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == display_name)
    }

    /// Like [`find_by_name`](Self::find_by_name), but a miss is an error
    pub fn find_by_name_or_err(&self, display_name: &str) -> Result<&Station> {
        self.find_by_name(display_name)
            .ok_or_else(|| Error::StationNameNotFound(display_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Stations strictly after `index`, in catalog order
    pub(crate) fn ahead_of(&self, index: usize) -> &[Station] {
        self.stations.get(index + 1..).unwrap_or(&[])
    }
}

/// Compose the display name a user means when typing a short name.
///
/// Station names conventionally carry a suffix marking them as stations
/// (`台北` → `台北站`). A name that already ends with the suffix is kept.
pub fn display_name(short_name: &str, suffix: &str) -> String {
    let trimmed = short_name.trim();
    if suffix.is_empty() || trimmed.ends_with(suffix) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, suffix)
    }
}

fn parse_station(index: usize, raw: RawStation) -> Result<Station> {
    let malformed = |reason: String| Error::MalformedStation { row: index, reason };

    let name = raw.name.trim();
    if name.is_empty() {
        return Err(malformed("missing name".into()));
    }
    // Names are stored unquoted in the one-line-per-visit history
    if name.contains(SEPARATOR) || name.contains(['\n', '\r']) {
        return Err(malformed(format!("name '{}' cannot be recorded in history", name)));
    }

    let latitude = parse_degrees(&raw.latitude)
        .ok_or_else(|| malformed(format!("invalid latitude '{}'", raw.latitude)))?;
    let longitude = parse_degrees(&raw.longitude)
        .ok_or_else(|| malformed(format!("invalid longitude '{}'", raw.longitude)))?;

    let address = raw
        .address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    if address.as_deref().is_some_and(|a| a.contains(['\n', '\r'])) {
        return Err(malformed("address spans several lines".into()));
    }

    Ok(Station {
        index,
        name: name.to_string(),
        latitude,
        longitude,
        address,
    })
}

fn parse_degrees(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
