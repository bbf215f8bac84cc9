//! World simulation engine.
//!
//! This module implements the Daisyworld grid: radiative heating, heat
//! diffusion, and the aging and seeding of daisies, plus the loop and
//! reporting sinks that drive it.

pub mod grid;
pub mod report;
pub mod simulation;
pub mod world;

pub use grid::{diffuse, neighbourhood};
pub use report::{CsvReport, ReportSink, ScreenRenderer};
pub use simulation::{simulate, Simulation, SimulationResult};
pub use world::{World, DIFFUSION_RATE};
