//! Trip state: where we are and where we have been.

use crate::VisitRecord;

/// Whether the trip has any recorded visits yet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripPhase {
    Empty,
    Active,
}

/// The only mutable state of the engine.
///
/// `visited` only grows through [`advance`](Self::advance) and is only
/// cleared by [`reset`](Self::reset). Callers check indices against the
/// catalog before handing them in.
#[derive(Clone, Debug, PartialEq)]
pub struct TripState {
    current_index: usize,
    visited: Vec<VisitRecord>,
}

impl TripState {
    /// A trip at `start_index` with no history
    pub fn new(start_index: usize) -> Self {
        Self {
            current_index: start_index,
            visited: Vec::new(),
        }
    }

    /// Rebuild a trip from persisted position and history
    pub fn restore(current_index: usize, visited: Vec<VisitRecord>) -> Self {
        Self {
            current_index,
            visited,
        }
    }

    pub fn current(&self) -> usize {
        self.current_index
    }

    pub fn visited(&self) -> &[VisitRecord] {
        &self.visited
    }

    pub fn phase(&self) -> TripPhase {
        if self.visited.is_empty() {
            TripPhase::Empty
        } else {
            TripPhase::Active
        }
    }

    /// Move to the snapshot's station and record the visit
    pub fn advance(&mut self, snapshot: VisitRecord) -> &VisitRecord {
        self.current_index = snapshot.station_index;
        self.visited.push(snapshot);
        &self.visited[self.visited.len() - 1]
    }

    /// Clear history and restart at `initial_index`, optionally recording the origin
    pub fn reset(&mut self, initial_index: usize, origin: Option<VisitRecord>) {
        self.current_index = initial_index;
        self.visited.clear();
        self.visited.extend(origin);
    }
}
