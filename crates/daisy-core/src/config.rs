//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Grids wider than this are never drawn to the terminal
pub const MAX_RENDER_SIZE: usize = 30;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Initial share of black daisies (0.0 to 1.0)
    pub start_black_fraction: f64,
    /// Initial share of white daisies (0.0 to 1.0)
    pub start_white_fraction: f64,
    /// Ticks a daisy lives before the patch turns barren
    pub max_age: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 20,
            start_black_fraction: 0.2,
            start_white_fraction: 0.2,
            max_age: 25,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ticks to run the simulation
    pub iterations: u64,
    /// Solar luminosity, constant for the whole run
    pub solar_luminosity: f64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Draw the grid to the terminal after every tick
    pub print_to_screen: bool,
    /// Pause between rendered frames (milliseconds)
    pub frame_delay_ms: u64,
    /// Destination of the per-tick statistics table
    pub output_path: PathBuf,
    /// World configuration
    pub world: WorldConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            solar_luminosity: 1.0,
            seed: 0,
            print_to_screen: true,
            frame_delay_ms: 100,
            output_path: PathBuf::from("data.csv"),
            world: WorldConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load a run configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rendering is suppressed for grids too large to fit a terminal.
    pub fn effective_print_to_screen(&self) -> bool {
        self.print_to_screen && self.world.size <= MAX_RENDER_SIZE
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.size == 0 {
            return Err(Error::Config("grid size must be at least 1".to_string()));
        }
        if !self.solar_luminosity.is_finite() {
            return Err(Error::Config(format!(
                "solar luminosity must be finite, got {}",
                self.solar_luminosity
            )));
        }
        Ok(())
    }
}
