//! Candidate search: stations ahead of the base within a distance band.

use crate::geo::distance;
use crate::{Candidate, Error, Result, StationCatalog};
use serde::Serialize;

/// Inclusive `[min_km, max_km]` distance range
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DistanceBand {
    min_km: f64,
    max_km: f64,
}

impl DistanceBand {
    pub fn new(min_km: f64, max_km: f64) -> Result<Self> {
        if !min_km.is_finite() || !max_km.is_finite() {
            return Err(Error::Config(format!(
                "distance band must be finite, got [{}, {}]",
                min_km, max_km
            )));
        }
        if min_km < 0.0 || min_km > max_km {
            return Err(Error::Config(format!(
                "distance band needs 0 <= min <= max, got [{}, {}]",
                min_km, max_km
            )));
        }
        Ok(Self { min_km, max_km })
    }

    pub fn min_km(&self) -> f64 {
        self.min_km
    }

    pub fn max_km(&self) -> f64 {
        self.max_km
    }

    pub fn contains(&self, km: f64) -> bool {
        self.min_km <= km && km <= self.max_km
    }
}

/// Every station after `base_index` whose distance from the base falls in `band`
///
/// Only looks ahead in catalog order and never wraps. An empty result is the
/// normal outcome at the end of the line.
pub fn find_ahead(
    catalog: &StationCatalog,
    base_index: usize,
    band: DistanceBand,
) -> Result<Vec<Candidate>> {
    let origin = catalog.get(base_index)?.coordinate();

    let candidates: Vec<Candidate> = catalog
        .ahead_of(base_index)
        .iter()
        .filter_map(|station| {
            let distance_km = distance(origin, station.coordinate());
            band.contains(distance_km).then_some(Candidate {
                station_index: station.index,
                distance_km,
            })
        })
        .collect();

    tracing::debug!(
        "Found {} candidates ahead of station {} within [{}, {}] km",
        candidates.len(),
        base_index,
        band.min_km,
        band.max_km
    );

    Ok(candidates)
}
