use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::TableGeometry;
use crate::engine::{EngineResult, SimulationBackend};
use crate::error::{LaunchError, LaunchResult, LoadError};
use crate::render::{render, Plot};
use crate::request::encode;
use crate::state::{FormInput, InitialState, SimulationMode};
use crate::trajectory::{self, load, load_run, RunMetadata, Trajectory};
use crate::validate::validate;

/// Everything produced by one successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: InitialState,
    pub engine: EngineResult,
    pub trajectory: Trajectory,
    pub plot: Plot,
}

/// Drives one run end to end: validate, encode, invoke, load, lay out.
///
/// At most one run may be in flight per artifact path; concurrent runs
/// would overwrite each other's artifact.
pub struct Launcher<B> {
    backend: B,
    geometry: TableGeometry,
    artifact_path: PathBuf,
}

impl<B: SimulationBackend> Launcher<B> {
    /// Create a launcher reading the engine's artifact from `artifact_path`.
    pub fn new(backend: B, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            geometry: TableGeometry::STANDARD,
            artifact_path: artifact_path.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Parse the form snapshot, then run it.
    pub fn run_form(&self, form: &FormInput) -> LaunchResult<RunOutcome> {
        let state = form.parse()?;
        self.run(&state)
    }

    /// Run the engine for `state` and load what it produced.
    ///
    /// Nothing is sent to the engine unless `state` is admissible.
    pub fn run(&self, state: &InitialState) -> LaunchResult<RunOutcome> {
        validate(state, &self.geometry)?;

        let request = encode(state);
        info!(
            mode = %state.mode,
            x = state.x,
            y = state.y,
            angle = state.angle,
            "starting simulation"
        );
        debug!(request = request.as_str(), "encoded engine request");

        self.clear_previous_run()?;

        let engine = self.backend.run(&request)?;
        if !engine.success() {
            warn!(exit_code = engine.exit_code, "engine reported failure");
        }
        let engine = engine.into_success()?;
        info!("simulation finished successfully");

        let metadata = RunMetadata {
            initial_state: *state,
            radius: self.geometry.radius,
        };
        let trajectory = load(&self.artifact_path)?;
        if let Err(err) = trajectory::write_metadata(&self.artifact_path, &metadata) {
            warn!(%err, "could not record run metadata; later re-plots will infer the table shape");
        }

        let plot = render(&trajectory, &self.geometry, Some(state.mode));
        Ok(RunOutcome {
            state: *state,
            engine,
            trajectory,
            plot,
        })
    }

    /// Remove the previous artifact and sidecar so stale data is never mistaken for this run's.
    fn clear_previous_run(&self) -> LaunchResult<()> {
        let stale = match fs::remove_file(&self.artifact_path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => trajectory::clear_metadata(&self.artifact_path),
        };
        stale.map_err(|err| {
            LaunchError::execution(format!(
                "could not clear previous output at {}: {err}",
                self.artifact_path.display()
            ))
        })
    }
}

/// Lay out a previously written artifact without running the engine.
///
/// `mode` overrides the recorded table shape; without either the shape is
/// inferred from the data.
pub fn replot(
    artifact: impl AsRef<Path>,
    geometry: &TableGeometry,
    mode: Option<SimulationMode>,
) -> Result<Plot, LoadError> {
    let run = load_run(artifact)?;
    let mode = mode.or_else(|| run.metadata.as_ref().map(RunMetadata::mode));
    Ok(render(&run.trajectory, geometry, mode))
}
