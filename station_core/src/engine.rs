//! Selection engine: find, choose and advance in one step.
//!
//! These functions are pure over the catalog and the trip; persistence is
//! layered on top by [`crate::session`].

use crate::config::{Config, RouteConfig};
use crate::finder::{find_ahead, DistanceBand};
use crate::policy::choose_next;
use crate::{Candidate, Result, StationCatalog, TripState, VisitRecord};
use rand::Rng;

/// Parameters of a single draw
#[derive(Clone, Copy, Debug)]
pub struct SelectionConfig {
    pub band: DistanceBand,
    pub proximity_limit: usize,
}

impl SelectionConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            band: config.selection.band()?,
            proximity_limit: config.selection.proximity_limit,
        })
    }
}

/// A successful draw
#[derive(Clone, Debug, PartialEq)]
pub struct Draw {
    /// Station index the draw started from
    pub from: usize,
    pub candidate: Candidate,
    pub record: VisitRecord,
}

/// Draw the next station and advance the trip
///
/// `Ok(None)` means no station qualified; the trip is left untouched.
pub fn draw_next<R: Rng + ?Sized>(
    catalog: &StationCatalog,
    trip: &mut TripState,
    config: &SelectionConfig,
    rng: &mut R,
) -> Result<Option<Draw>> {
    let from = trip.current();
    let candidates = find_ahead(catalog, from, config.band)?;

    let Some(candidate) = choose_next(&candidates, from, rng, config.proximity_limit) else {
        tracing::info!(
            "No station found within [{}, {}] km ahead of station {}",
            config.band.min_km(),
            config.band.max_km(),
            from
        );
        return Ok(None);
    };

    let station = catalog.get(candidate.station_index)?;
    let record = trip.advance(VisitRecord::from(station)).clone();

    tracing::info!(
        "Chosen station: {} within {} km of station {}",
        record.name,
        candidate.distance_km,
        from
    );

    Ok(Some(Draw {
        from,
        candidate,
        record,
    }))
}

/// Advance the trip to the station with this exact display name
pub fn add_by_name(
    catalog: &StationCatalog,
    trip: &mut TripState,
    display_name: &str,
) -> Result<VisitRecord> {
    let station = catalog.find_by_name_or_err(display_name)?;
    let record = trip.advance(VisitRecord::from(station)).clone();
    tracing::info!("Added station {} ({})", record.name, record.station_index);
    Ok(record)
}

/// Restart the trip at the configured origin
pub fn reset_trip(
    catalog: &StationCatalog,
    trip: &mut TripState,
    route: &RouteConfig,
) -> Result<()> {
    let origin = catalog.get(route.start_index)?;
    let seed = route.seed_origin.then(|| VisitRecord::from(origin));
    trip.reset(route.start_index, seed);
    tracing::info!("Trip reset to station {} ({})", origin.name, origin.index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::abc_catalog;
    use crate::policy::seeded_rng;
    use crate::{Error, TripPhase};

    fn selection(min: f64, max: f64, proximity_limit: usize) -> SelectionConfig {
        SelectionConfig {
            band: DistanceBand::new(min, max).unwrap(),
            proximity_limit,
        }
    }

    #[test]
    fn test_draw_advances_to_only_candidate() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(0);
        let mut rng = seeded_rng(Some(5));

        let draw = draw_next(&catalog, &mut trip, &selection(10.0, 40.0, 20), &mut rng)
            .unwrap()
            .unwrap();

        assert_eq!(draw.from, 0);
        assert_eq!(draw.candidate.station_index, 1);
        assert_eq!(draw.record.name, "B站");
        assert_eq!(trip.current(), 1);
        assert_eq!(trip.visited().len(), 1);
    }

    #[test]
    fn test_draw_at_end_of_line_leaves_trip_untouched() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(2);
        let before = trip.clone();
        let mut rng = seeded_rng(Some(5));

        let draw = draw_next(&catalog, &mut trip, &selection(10.0, 40.0, 20), &mut rng).unwrap();

        assert!(draw.is_none());
        assert_eq!(trip, before);
    }

    #[test]
    fn test_draw_respects_proximity_limit() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(0);
        let mut rng = seeded_rng(Some(5));

        // B is in band but one index away; a zero limit rules it out
        let draw = draw_next(&catalog, &mut trip, &selection(10.0, 40.0, 0), &mut rng).unwrap();
        assert!(draw.is_none());
    }

    #[test]
    fn test_draw_from_invalid_position() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(99);
        let mut rng = seeded_rng(Some(5));

        let result = draw_next(&catalog, &mut trip, &selection(10.0, 40.0, 20), &mut rng);
        assert!(matches!(result, Err(Error::UnknownStation { index: 99, .. })));
    }

    #[test]
    fn test_add_by_name() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(0);

        let record = add_by_name(&catalog, &mut trip, "C站").unwrap();
        assert_eq!(record.station_index, 2);
        assert_eq!(trip.current(), 2);

        let missing = add_by_name(&catalog, &mut trip, "C");
        assert!(matches!(missing, Err(Error::StationNameNotFound(_))));
        assert_eq!(trip.visited().len(), 1);
    }

    #[test]
    fn test_reset_with_and_without_origin() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(2);
        add_by_name(&catalog, &mut trip, "B站").unwrap();

        let route = RouteConfig {
            start_index: 0,
            seed_origin: false,
        };
        reset_trip(&catalog, &mut trip, &route).unwrap();
        assert_eq!(trip.current(), 0);
        assert_eq!(trip.phase(), TripPhase::Empty);

        let route = RouteConfig {
            start_index: 0,
            seed_origin: true,
        };
        reset_trip(&catalog, &mut trip, &route).unwrap();
        assert_eq!(trip.phase(), TripPhase::Active);
        assert_eq!(trip.visited()[0].name, "A站");
    }

    #[test]
    fn test_reset_to_unknown_start_fails() {
        let catalog = abc_catalog();
        let mut trip = TripState::new(0);
        let route = RouteConfig {
            start_index: 33,
            seed_origin: false,
        };

        assert!(matches!(
            reset_trip(&catalog, &mut trip, &route),
            Err(Error::UnknownStation { index: 33, len: 3 })
        ));
        assert_eq!(trip.current(), 0);
    }
}
