//! Launcher for a billiard trajectory simulation on a circular or
//! semi-circular table.
//!
//! The crate checks initial conditions, hands them to an external engine
//! over its stdin protocol, then loads and plots the trajectory the engine
//! writes to disk.
//!
//! Typical usage:
//! ```no_run
//! use billiard_launcher::{EngineConfig, FormInput, Launcher, ProcessBackend, SimulationMode};
//!
//! let config = EngineConfig::default().with_working_directory("/tmp/billiard");
//! let artifact = config.artifact_path();
//! let backend = ProcessBackend::new(config).expect("engine should be built");
//! let launcher = Launcher::new(backend, artifact);
//!
//! let form = FormInput::new(SimulationMode::SemiCircular, "2.0", "1.0", "0.5");
//! let outcome = launcher.run_form(&form).expect("run should succeed");
//! outcome.plot.write_svg("billiard.svg").unwrap();
//! ```

mod config;
mod engine;
mod error;
mod launcher;
mod render;
mod request;
mod state;
mod trajectory;
mod validate;

pub use config::{EngineConfig, TableGeometry, DEFAULT_ARTIFACT_NAME};
pub use engine::{
    invoke, resolve_engine, CancelHandle, EngineResult, ProcessBackend, SimulationBackend,
};
pub use error::{
    InputParseError, LaunchError, LaunchResult, LoadError, RequestParseError, ValidationError,
};
pub use launcher::{replot, Launcher, RunOutcome};
pub use render::{infer_mode, render, ModeSource, Plot, FLAT_EDGE_TOLERANCE};
pub use request::{encode, format_number, EngineRequest};
pub use state::{FormInput, InitialState, SimulationMode};
pub use trajectory::{
    clear_metadata, load, load_run, metadata_path, write_metadata, LoadedRun, RunMetadata,
    Trajectory,
};
pub use validate::validate;
