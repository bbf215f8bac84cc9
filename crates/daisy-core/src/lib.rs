//! Core types and rules for the Daisyworld simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod heating;
pub mod stats;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use heating::*;
pub use stats::*;
