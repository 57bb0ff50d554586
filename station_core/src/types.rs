//! Core domain types for the station lottery.
//!
//! This module defines the fundamental types used throughout the system:
//! - Coordinates and stations
//! - Candidates produced by the finder
//! - Visit records kept in the trip history

use serde::{Deserialize, Serialize};

// ============================================================================
// Geography
// ============================================================================

/// A point on the globe, in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ============================================================================
// Stations
// ============================================================================

/// A railway station as loaded from the station source.
///
/// `index` is the station's position in catalog order, which is assumed to
/// follow the physical route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub index: usize,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl Station {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// An unparsed station record, straight from the station source
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawStation {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub address: Option<String>,
}

// ============================================================================
// Selection
// ============================================================================

/// A station eligible as the next stop, with its distance from the base
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Candidate {
    pub station_index: usize,
    /// Rounded to 2 decimals
    pub distance_km: f64,
}

// ============================================================================
// History
// ============================================================================

/// Snapshot of a station taken at the moment it was visited.
///
/// Fields are copied out of the catalog so later catalog corrections never
/// rewrite history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub station_index: usize,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl VisitRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl From<&Station> for VisitRecord {
    fn from(station: &Station) -> Self {
        VisitRecord {
            station_index: station.index,
            name: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            address: station.address.clone(),
        }
    }
}
