//! Configuration file support for the station lottery.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/stalot/config.toml`.
//! Every field has a default, so a partial file (or none at all) is fine.

use crate::finder::DistanceBand;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub selection: SelectionSettings,

    #[serde(default)]
    pub route: RouteConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Station source layout
///
/// Column numbers are 0-based positions in each CSV record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Station CSV; `<data_dir>/station.csv` when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// When false every row is a station, and row position is the index
    #[serde(default)]
    pub has_headers: bool,

    #[serde(default = "default_name_column")]
    pub name_column: usize,

    #[serde(default = "default_address_column")]
    pub address_column: usize,

    #[serde(default = "default_latitude_column")]
    pub latitude_column: usize,

    #[serde(default = "default_longitude_column")]
    pub longitude_column: usize,

    /// Appended to short names typed by the user (`台北` → `台北站`)
    #[serde(default = "default_station_suffix")]
    pub station_suffix: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            has_headers: false,
            name_column: default_name_column(),
            address_column: default_address_column(),
            latitude_column: default_latitude_column(),
            longitude_column: default_longitude_column(),
            station_suffix: default_station_suffix(),
        }
    }
}

impl CatalogConfig {
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir.join("station.csv"))
    }
}

/// Distance band and index-proximity limit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default = "default_min_km")]
    pub min_km: f64,

    #[serde(default = "default_max_km")]
    pub max_km: f64,

    /// Largest allowed gap between the current and the chosen station index
    #[serde(default = "default_proximity_limit")]
    pub proximity_limit: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            min_km: default_min_km(),
            max_km: default_max_km(),
            proximity_limit: default_proximity_limit(),
        }
    }
}

impl SelectionSettings {
    pub fn band(&self) -> Result<DistanceBand> {
        DistanceBand::new(self.min_km, self.max_km)
    }
}

/// Where a fresh trip starts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default = "default_start_index")]
    pub start_index: usize,

    /// Record the origin as the first visit on reset
    #[serde(default = "default_seed_origin")]
    pub seed_origin: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            start_index: default_start_index(),
            seed_origin: default_seed_origin(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("stalot")
}

fn default_name_column() -> usize {
    2
}

fn default_address_column() -> usize {
    4
}

fn default_latitude_column() -> usize {
    6
}

fn default_longitude_column() -> usize {
    7
}

fn default_station_suffix() -> String {
    "站".into()
}

fn default_min_km() -> f64 {
    10.0
}

fn default_max_km() -> f64 {
    40.0
}

fn default_proximity_limit() -> usize {
    20
}

fn default_start_index() -> usize {
    33
}

fn default_seed_origin() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("stalot").join("config.toml")
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.selection.band()?;
        let c = &self.catalog;
        if c.name_column == c.latitude_column
            || c.name_column == c.longitude_column
            || c.latitude_column == c.longitude_column
        {
            return Err(Error::Config(
                "name, latitude and longitude columns must all differ".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
