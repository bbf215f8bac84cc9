//! Core type definitions for the simulation.

use crate::heating::local_heating;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Occupant of a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Black,
    White,
    Barren,
}

impl Species {
    /// Reflectivity of the surface this species presents to the sun
    pub fn albedo(&self) -> f64 {
        match self {
            Species::Black => 0.25,
            Species::White => 0.75,
            Species::Barren => 0.40,
        }
    }

    pub fn is_daisy(&self) -> bool {
        !matches!(self, Species::Barren)
    }
}

/// Two terminal columns per patch so the grid stays square.
impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Black => write!(f, "🌸"),
            Species::White => write!(f, "💮"),
            Species::Barren => write!(f, "  "),
        }
    }
}

/// A single cell of the world grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    species: Species,
    temperature: f64,
    age: u32,
}

impl Patch {
    /// Create a patch. Fails when `age` is negative.
    pub fn new(species: Species, temperature: f64, age: i64) -> Result<Self> {
        let age = u32::try_from(age).map_err(|_| {
            Error::Precondition(format!("patch age must be non-negative, got {}", age))
        })?;

        Ok(Self {
            species,
            temperature,
            age,
        })
    }

    /// Bare ground at temperature zero
    pub fn barren() -> Self {
        Self {
            species: Species::Barren,
            temperature: 0.0,
            age: 0,
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    /// Move halfway towards the equilibrium temperature for this surface.
    pub fn absorb_light(&mut self, solar_luminosity: f64) {
        let heating = local_heating(solar_luminosity, self.species.albedo());
        self.temperature = (self.temperature + heating) * 0.5;
    }

    /// Age by one tick. A patch older than `max_age` becomes barren; its age is kept.
    pub fn age_and_die(&mut self, max_age: u32) {
        self.age = self.age.saturating_add(1);
        if self.age > max_age {
            self.species = Species::Barren;
        }
    }

    /// Quadratic in temperature; not clamped to `[0, 1]`.
    pub fn seeding_threshold(&self) -> f64 {
        let t = self.temperature;
        0.1457 * t - 0.0032 * t * t - 0.6443
    }

    pub fn sprout(&mut self, species: Species) {
        self.species = species;
        self.age = 0;
    }
}
