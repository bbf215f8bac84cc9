//! Aggregate statistics over a world grid.

use crate::{Patch, Species};
use serde::{Deserialize, Serialize};

/// Column names of the per-tick statistics table
pub const CSV_HEADER: &str =
    "Solar luminosity,Global temperature,Black daisies,White daisies,Barren lands";

/// Aggregate record emitted after every tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldStats {
    pub solar_luminosity: f64,
    /// Mean patch temperature; zero for an empty grid
    pub mean_temperature: f64,
    pub black_count: usize,
    pub white_count: usize,
    pub barren_count: usize,
}

impl WorldStats {
    pub fn from_patches(patches: &[Patch], solar_luminosity: f64) -> Self {
        let mut stats = Self {
            solar_luminosity,
            ..Default::default()
        };

        let mut total_temperature = 0.0;
        for patch in patches {
            total_temperature += patch.temperature();
            match patch.species() {
                Species::Black => stats.black_count += 1,
                Species::White => stats.white_count += 1,
                Species::Barren => stats.barren_count += 1,
            }
        }

        if !patches.is_empty() {
            stats.mean_temperature = total_temperature / patches.len() as f64;
        }

        stats
    }

    pub fn total(&self) -> usize {
        self.black_count + self.white_count + self.barren_count
    }

    /// One comma-separated row, fields in [`CSV_HEADER`] order
    pub fn to_csv_record(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.solar_luminosity,
            self.mean_temperature,
            self.black_count,
            self.white_count,
            self.barren_count
        )
    }
}
