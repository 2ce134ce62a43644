//! billiard CLI - run the billiard simulation engine and plot its trajectory
//!
//! Usage:
//!     billiard run --mode semi-circular --x 2.0 --y 1.0 --angle 0.5
//!     billiard plot --data simulation_data.txt --output billiard.svg

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use billiard_launcher::{
    replot, validate, EngineConfig, FormInput, LaunchError, LaunchResult, Launcher,
    ProcessBackend, SimulationMode, TableGeometry, DEFAULT_ARTIFACT_NAME,
};
use clap::{Parser, Subcommand};
use tracing::info;

/// Billiard trajectory launcher
#[derive(Parser)]
#[command(name = "billiard")]
#[command(version)]
#[command(about = "Run the billiard simulation engine and plot the trajectory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the initial state, run the engine and plot the result
    Run {
        /// Table shape: circular (1) or semi-circular (2)
        #[arg(long, default_value = "circular")]
        mode: SimulationMode,

        /// Initial x coordinate
        #[arg(long, default_value = "2.0", allow_hyphen_values = true)]
        x: String,

        /// Initial y coordinate
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        y: String,

        /// Initial angle in radians
        #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
        angle: String,

        /// Engine executable; searched for in the working directory when omitted
        #[arg(long, env = "BILLIARD_ENGINE")]
        engine: Option<PathBuf>,

        /// Directory the engine runs in and writes its data to
        #[arg(long, env = "BILLIARD_WORKDIR", default_value = ".")]
        workdir: PathBuf,

        /// Kill the engine after this many seconds
        #[arg(long, env = "BILLIARD_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,

        /// Where to write the plot
        #[arg(short, long, default_value = "billiard.svg")]
        output: PathBuf,
    },

    /// Plot an existing trajectory file without running the engine
    Plot {
        /// Trajectory data written by a previous run
        #[arg(long, default_value = DEFAULT_ARTIFACT_NAME)]
        data: PathBuf,

        /// Table shape; taken from the run metadata, or inferred, when omitted
        #[arg(long)]
        mode: Option<SimulationMode>,

        /// Where to write the plot
        #[arg(short, long, default_value = "billiard.svg")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Printed directly so the failure survives RUST_LOG=off.
            eprintln!("{}: {err}", error_title(&err));
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> LaunchResult<()> {
    match command {
        Commands::Run {
            mode,
            x,
            y,
            angle,
            engine,
            workdir,
            timeout_secs,
            output,
        } => {
            let form = FormInput::new(mode, x, y, angle);
            let state = form.parse()?;
            // Reject an inadmissible state before looking for the engine.
            validate(&state, &TableGeometry::STANDARD)?;

            let mut config = EngineConfig::default().with_working_directory(workdir);
            config.binary_path = engine;
            if let Some(secs) = timeout_secs {
                config = config.with_run_timeout(Duration::from_secs(secs));
            }
            let artifact = config.artifact_path();

            let launcher = Launcher::new(ProcessBackend::new(config)?, artifact);
            let outcome = launcher.run(&state)?;
            outcome.plot.write_svg(&output).map_err(LaunchError::Render)?;
            info!(
                points = outcome.trajectory.len(),
                plot = %output.display(),
                "plot written"
            );
            Ok(())
        }
        Commands::Plot { data, mode, output } => {
            let plot = replot(&data, &TableGeometry::STANDARD, mode)?;
            plot.write_svg(&output).map_err(LaunchError::Render)?;
            info!(plot = %output.display(), "plot written");
            Ok(())
        }
    }
}

fn error_title(err: &LaunchError) -> &'static str {
    match err {
        LaunchError::InputParse(_) => "input error",
        LaunchError::Validation(_) => "physics error",
        LaunchError::EngineNotFound { .. } => "engine not found",
        LaunchError::EngineFailed { .. } => "simulation error",
        LaunchError::Load(_) => "data error",
        LaunchError::Render(_) => "plot error",
        LaunchError::Execution(_) | LaunchError::TimedOut(_) | LaunchError::Cancelled => {
            "execution error"
        }
    }
}
