//! Reporting sinks fed by the simulation loop.

use crate::world::World;
use daisy_core::{Result, WorldStats, CSV_HEADER};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Terminal reset sequence written before every frame
const CLEAR_SCREEN: &str = "\x1bc";

/// Consumer of per-tick simulation output
pub trait ReportSink {
    /// Called once before the first tick
    fn begin(&mut self, _world: &World) -> Result<()> {
        Ok(())
    }

    /// Called after every tick with the updated world and its aggregates
    fn record(&mut self, tick: u64, world: &World, stats: &WorldStats) -> Result<()>;

    /// Called once after the last tick
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes one header line and one row per tick.
pub struct CsvReport<W: Write> {
    out: W,
}

impl CsvReport<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> CsvReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for CsvReport<W> {
    fn begin(&mut self, _world: &World) -> Result<()> {
        writeln!(self.out, "{}", CSV_HEADER)?;
        Ok(())
    }

    fn record(&mut self, _tick: u64, _world: &World, stats: &WorldStats) -> Result<()> {
        writeln!(self.out, "{}", stats.to_csv_record())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Draws the grid to a terminal, one frame per tick.
pub struct ScreenRenderer<W: Write> {
    out: W,
    frame_delay: Duration,
}

impl ScreenRenderer<std::io::Stdout> {
    pub fn stdout(frame_delay: Duration) -> Self {
        Self::new(std::io::stdout(), frame_delay)
    }
}

impl<W: Write> ScreenRenderer<W> {
    pub fn new(out: W, frame_delay: Duration) -> Self {
        Self { out, frame_delay }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, world: &World) -> Result<()> {
        write!(self.out, "{}", CLEAR_SCREEN)?;
        for row in world.rows() {
            for patch in row {
                write!(self.out, "{}", patch.species())?;
            }
            writeln!(self.out)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportSink for ScreenRenderer<W> {
    fn record(&mut self, _tick: u64, world: &World, _stats: &WorldStats) -> Result<()> {
        self.draw(world)?;
        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
        Ok(())
    }
}
