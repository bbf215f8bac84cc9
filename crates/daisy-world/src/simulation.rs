//! Simulation loop driving a world for a fixed number of ticks.

use crate::report::ReportSink;
use crate::world::World;
use daisy_core::{Result, RunConfig, WorldStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Ticks between progress log lines
const PROGRESS_INTERVAL: u64 = 100;

const HISTORY_PREALLOC: u64 = 4096;

pub struct Simulation {
    world: World,
    config: RunConfig,
    tick: u64,
}

impl Simulation {
    /// Build the world described by `config` and seed it from `config.seed`.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let world = World::from_config(&config.world, config.seed)?;
        Ok(Self::with_world(world, config))
    }

    /// Drive an already constructed world. `config.world` is ignored.
    pub fn with_world(world: World, config: RunConfig) -> Self {
        Self {
            world,
            config,
            tick: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run the simulation for the configured number of ticks, reporting to
    /// every sink after each one.
    #[instrument(
        skip(self, sinks),
        fields(iterations = self.config.iterations, size = self.world.size())
    )]
    pub fn run(&mut self, sinks: &mut [&mut dyn ReportSink]) -> Result<SimulationResult> {
        info!("Starting simulation for {} ticks", self.config.iterations);

        let solar_luminosity = self.config.solar_luminosity;
        let mut history = Vec::with_capacity(self.config.iterations.min(HISTORY_PREALLOC) as usize);

        for sink in sinks.iter_mut() {
            sink.begin(&self.world)?;
        }

        for _ in 0..self.config.iterations {
            self.world.step(solar_luminosity);
            self.tick += 1;

            let stats = self.world.stats(solar_luminosity);
            for sink in sinks.iter_mut() {
                sink.record(self.tick, &self.world, &stats)?;
            }

            debug!(
                tick = self.tick,
                mean_temperature = stats.mean_temperature,
                "Tick complete"
            );
            if self.tick % PROGRESS_INTERVAL == 0 {
                info!(
                    "Tick {}/{}: {} black, {} white, {} barren, mean temperature {:.2}",
                    self.tick,
                    self.config.iterations,
                    stats.black_count,
                    stats.white_count,
                    stats.barren_count,
                    stats.mean_temperature
                );
            }

            history.push(stats);
        }

        for sink in sinks.iter_mut() {
            sink.finish()?;
        }

        let result = SimulationResult {
            ticks: self.tick,
            final_stats: self.world.stats(solar_luminosity),
            history,
        };
        self.emit_run_summary(&result);

        Ok(result)
    }

    fn emit_run_summary(&self, result: &SimulationResult) {
        info!(
            event = "run_summary",
            total_ticks = result.ticks,
            black_count = result.final_stats.black_count,
            white_count = result.final_stats.white_count,
            barren_count = result.final_stats.barren_count,
            mean_temperature = result.final_stats.mean_temperature,
            "Simulation complete"
        );
    }
}

/// Run `world` for `config.iterations` ticks.
pub fn simulate(
    world: World,
    config: RunConfig,
    sinks: &mut [&mut dyn ReportSink],
) -> Result<SimulationResult> {
    Simulation::with_world(world, config).run(sinks)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub ticks: u64,
    /// Statistics after the last tick (or of the initial grid for zero ticks)
    pub final_stats: WorldStats,
    /// One record per tick
    pub history: Vec<WorldStats>,
}
