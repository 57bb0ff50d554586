#![forbid(unsafe_code)]

//! Core domain model and selection engine for the station lottery.
//!
//! This crate provides:
//! - Domain types (stations, candidates, visit records)
//! - The station catalog and its CSV source
//! - Distance math, candidate search and random selection
//! - Trip state and its persistence (position file, history log)
//! - History export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod geo;
pub mod catalog;
pub mod source;
pub mod finder;
pub mod policy;
pub mod trip;
pub mod engine;
pub mod position;
pub mod history;
pub mod lock;
pub mod session;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{display_name, StationCatalog};
pub use config::Config;
pub use finder::{find_ahead, DistanceBand};
pub use policy::{choose_next, seeded_rng};
pub use trip::{TripPhase, TripState};
pub use engine::{draw_next, Draw, SelectionConfig};
pub use position::{FilePositionStore, PositionStore};
pub use history::{HistoryStore, TextHistoryLog};
pub use lock::DataDirLock;
pub use session::Session;
