//! Command-line entry point for the Daisyworld simulation.

mod telemetry;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use daisy_core::RunConfig;
use daisy_world::{CsvReport, ReportSink, ScreenRenderer, Simulation};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "daisyworld")]
#[command(version)]
#[command(about = "Daisyworld: temperature regulation through black and white daisies")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(RunArgs),

    /// Write the default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "daisyworld.json")]
        output: PathBuf,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Configuration file (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid side length
    #[arg(long)]
    size: Option<usize>,

    /// Initial fraction of black daisies
    #[arg(long)]
    black: Option<f64>,

    /// Initial fraction of white daisies
    #[arg(long)]
    white: Option<f64>,

    /// Maximum daisy age in ticks
    #[arg(long)]
    max_age: Option<u32>,

    /// Number of ticks to simulate
    #[arg(short, long)]
    iterations: Option<u64>,

    /// Solar luminosity
    #[arg(long)]
    luminosity: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Statistics output (CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw the grid
    #[arg(long)]
    no_render: bool,

    /// Pause between frames in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

impl RunArgs {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(size) = self.size {
            config.world.size = size;
        }
        if let Some(black) = self.black {
            config.world.start_black_fraction = black;
        }
        if let Some(white) = self.white {
            config.world.start_white_fraction = white;
        }
        if let Some(max_age) = self.max_age {
            config.world.max_age = max_age;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(luminosity) = self.luminosity {
            config.solar_luminosity = luminosity;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.no_render {
            config.print_to_screen = false;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.frame_delay_ms = delay_ms;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_telemetry(cli.json_logs)?;

    match cli.command {
        Commands::Run(args) => run_simulation(args.into_config()?),
        Commands::Init { output } => generate_config(output),
    }
}

fn run_simulation(config: RunConfig) -> Result<()> {
    info!(
        size = config.world.size,
        iterations = config.iterations,
        seed = config.seed,
        output = %config.output_path.display(),
        "Starting Daisyworld"
    );

    let render = config.effective_print_to_screen();
    if config.print_to_screen && !render {
        info!(size = config.world.size, "Grid too large to draw, rendering disabled");
    }

    let output_path = config.output_path.clone();
    let mut screen = ScreenRenderer::stdout(Duration::from_millis(config.frame_delay_ms));

    let mut simulation = Simulation::new(config)?;
    let mut csv = CsvReport::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let result = if render {
        simulation.run(&mut [&mut csv as &mut dyn ReportSink, &mut screen])?
    } else {
        simulation.run(&mut [&mut csv as &mut dyn ReportSink])?
    };

    info!(
        ticks = result.ticks,
        black = result.final_stats.black_count,
        white = result.final_stats.white_count,
        barren = result.final_stats.barren_count,
        mean_temperature = result.final_stats.mean_temperature,
        "Run finished"
    );
    Ok(())
}

fn generate_config(output: PathBuf) -> Result<()> {
    RunConfig::default()
        .write_json_file(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Default configuration written to {}", output.display());
    Ok(())
}
