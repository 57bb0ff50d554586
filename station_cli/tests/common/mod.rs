//! Shared fixtures for the stalot integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A: origin. B: ~24 km ahead of A. C: ~75 km from A, ~52 km from B.
pub const STATIONS: &str = "\
1,AAA,A站,Alpha,A市,00-1,25.0,121.5
2,BBB,B站,Bravo,B市,00-2,25.2,121.6
3,CCC,C站,Charlie,C市,00-3,25.5,122.0
";

/// Helper to get the path to the CLI binary
pub fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stalot"))
}

/// A throwaway data directory with a station file and a config
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_route(0, false)
    }

    pub fn with_route(start_index: usize, seed_origin: bool) -> Self {
        Self::with_config(&format!(
            "[route]\nstart_index = {}\nseed_origin = {}\n",
            start_index, seed_origin
        ))
    }

    /// Only the start index is set; everything else keeps its default
    pub fn with_start(start_index: usize) -> Self {
        Self::with_config(&format!("[route]\nstart_index = {}\n", start_index))
    }

    fn with_config(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("station.csv"), STATIONS).unwrap();
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// The binary with data dir, config and catalog pointed at this fixture
    pub fn cmd(&self) -> Command {
        let mut cmd = cli();
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--config")
            .arg(self.path().join("config.toml"))
            .arg("--catalog")
            .arg(self.path().join("station.csv"));
        cmd
    }

    pub fn history(&self) -> String {
        fs::read_to_string(self.data_dir().join("history.txt")).unwrap_or_default()
    }

    pub fn position(&self) -> Option<String> {
        fs::read_to_string(self.data_dir().join("data.txt")).ok()
    }
}
