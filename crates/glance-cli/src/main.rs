//! Glance command-line interface.
//!
//! Run grazing-incidence scattering simulations from TOML job files:
//! ```sh
//! glance run job.toml
//! glance validate job.toml
//! glance demo --output ./output
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use glance_core::detector::{Axis, DetectorGrid};
use glance_core::{standard_samples, Beam, Simulation};

#[derive(Parser)]
#[command(name = "glance")]
#[command(about = "Glance: grazing-incidence scattering in the DWBA")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides the config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a job file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Simulate a built-in demo sample (correlated spheres on silicon).
    Demo {
        /// Output directory.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let simulation = runner::build_simulation(&job)?;
            let outcome = simulation.run()?;
            if outcome.cancelled {
                println!("Run was cancelled; writing the partial map.");
            }

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            if job.output.save_csv {
                runner::write_map_csv(&outcome.intensity, &out_dir.join("intensity.csv"))?;
            }
            if job.output.save_json {
                runner::write_map_json(&outcome.intensity, &out_dir.join("intensity.json"))?;
            }
            println!(
                "Simulation complete: {} bins, peak intensity {:.4e}.",
                outcome.intensity.flatten().len(),
                outcome.intensity.max_intensity()
            );
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            // Building the simulation exercises every physical validation.
            let _simulation = runner::build_simulation(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Demo { output } => {
            let sample = standard_samples::correlated_spheres_on_substrate(5.0, 25.0);
            let beam = Beam::new(0.1, 0.2f64.to_radians(), 0.0);
            let detector = DetectorGrid::new(
                Axis::new("alpha_f", 0.0, 2.0f64.to_radians(), 100)?,
                Axis::new("phi_f", (-1.5f64).to_radians(), 1.5f64.to_radians(), 100)?,
            );
            let outcome = Simulation::new(sample, beam, detector).run()?;
            runner::write_map_csv(&outcome.intensity, &output.join("demo.csv"))?;
            println!(
                "Demo complete: peak intensity {:.4e}.",
                outcome.intensity.max_intensity()
            );
            Ok(())
        }
    }
}
