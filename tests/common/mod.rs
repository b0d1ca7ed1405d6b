//! Common test utilities and fixtures
//!
//! Shared infrastructure for the CLI-level test crates.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Configuration that keeps engine sessions fast in tests
pub const FAST_CONFIG: &str = "[executor]\npoll_interval_ms = 10\n";

/// Get a command for the taskmill binary
pub fn taskmill_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("taskmill").unwrap()
}

/// A throwaway directory holding one config file
pub struct ConfigFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            temp_dir,
            config_path,
        }
    }

    /// Create a fixture already holding the fast-poll config
    pub fn fast() -> Self {
        let fixture = Self::new();
        fixture.write_config(FAST_CONFIG);
        fixture
    }

    pub fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    pub fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}
