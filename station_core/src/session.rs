//! A trip bound to its stores.
//!
//! [`Session`] restores the trip from a position store and a history store,
//! runs engine operations against it, and persists every change: history is
//! appended first, then the new position is written.

use crate::config::{Config, RouteConfig};
use crate::engine::{self, Draw, SelectionConfig};
use crate::finder::find_ahead;
use crate::history::HistoryStore;
use crate::position::PositionStore;
use crate::{Candidate, Result, StationCatalog, TripState, VisitRecord};
use rand::Rng;

pub struct Session<'a, P, H> {
    catalog: &'a StationCatalog,
    selection: SelectionConfig,
    route: RouteConfig,
    positions: P,
    history: H,
    trip: TripState,
}

impl<'a, P: PositionStore, H: HistoryStore> Session<'a, P, H> {
    /// Restore the trip from the stores
    ///
    /// With no stored position the trip starts at `route.start_index`.
    /// A stored position outside the catalog is an error, never clamped.
    pub fn open(catalog: &'a StationCatalog, config: &Config, positions: P, history: H) -> Result<Self> {
        let selection = SelectionConfig::from_config(config)?;
        let current = positions.read()?.unwrap_or(config.route.start_index);
        catalog.get(current)?;

        let visited = history.read_all()?;
        tracing::debug!(
            "Opened session at station {} with {} visits",
            current,
            visited.len()
        );

        Ok(Self {
            catalog,
            selection,
            route: config.route.clone(),
            positions,
            history,
            trip: TripState::restore(current, visited),
        })
    }

    pub fn trip(&self) -> &TripState {
        &self.trip
    }

    pub fn catalog(&self) -> &StationCatalog {
        self.catalog
    }

    pub fn selection(&self) -> &SelectionConfig {
        &self.selection
    }

    /// Distance-eligible stations ahead, before the proximity filter
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        find_ahead(self.catalog, self.trip.current(), self.selection.band)
    }

    /// Start over at the configured origin
    ///
    /// The in-memory trip only changes once the stores have accepted it.
    pub fn reset(&mut self) -> Result<()> {
        let mut trip = self.trip.clone();
        engine::reset_trip(self.catalog, &mut trip, &self.route)?;

        self.history.clear()?;
        for record in trip.visited() {
            self.history.append(record)?;
        }
        self.positions.write(trip.current())?;

        self.trip = trip;
        Ok(())
    }

    /// Draw the next station; `Ok(None)` when nothing qualifies
    ///
    /// On error the trip is left where it was.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Draw>> {
        let mut trip = self.trip.clone();
        let draw = engine::draw_next(self.catalog, &mut trip, &self.selection, rng)?;
        if let Some(draw) = &draw {
            self.persist(&draw.record)?;
            self.trip = trip;
        }
        Ok(draw)
    }

    /// Jump to a station by exact display name
    pub fn add(&mut self, display_name: &str) -> Result<VisitRecord> {
        let mut trip = self.trip.clone();
        let record = engine::add_by_name(self.catalog, &mut trip, display_name)?;
        self.persist(&record)?;
        self.trip = trip;
        Ok(record)
    }

    fn persist(&mut self, record: &VisitRecord) -> Result<()> {
        self.history.append(record)?;
        self.positions.write(record.station_index)
    }

    /// Hand the stores back, e.g. to inspect them in tests
    pub fn into_stores(self) -> (P, H) {
        (self.positions, self.history)
    }
}
