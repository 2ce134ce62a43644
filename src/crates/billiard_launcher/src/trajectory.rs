//! Reading the trajectory artifact the engine leaves behind.
//!
//! The artifact is plain text, one sample per line, `x` and `y` separated by
//! whitespace. Rows are kept in file order, which is the order in time.
//! A JSON sidecar next to it records the state that produced the run so a
//! later re-plot knows the table shape without guessing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LoadError;
use crate::state::{InitialState, SimulationMode};

/// Ordered ball positions, one per bounce, starting at the launch point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    points: Vec<(f64, f64)>,
}

impl Trajectory {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest y visited, or `None` for an empty trajectory.
    pub fn min_y(&self) -> Option<f64> {
        self.points.iter().map(|&(_, y)| y).reduce(f64::min)
    }
}

impl From<Vec<(f64, f64)>> for Trajectory {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points)
    }
}

/// Parameters of the run that produced an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub initial_state: InitialState,
    pub radius: f64,
}

impl RunMetadata {
    pub fn mode(&self) -> SimulationMode {
        self.initial_state.mode
    }
}

/// A trajectory together with whatever is known about the run behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRun {
    pub trajectory: Trajectory,
    /// `None` for artifacts written without a sidecar.
    pub metadata: Option<RunMetadata>,
}

/// Load the trajectory at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Trajectory, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: err,
        },
    })?;

    let trajectory = parse_trajectory(path, &text)?;
    debug!(path = %path.display(), points = trajectory.len(), "loaded trajectory");
    Ok(trajectory)
}

/// Load the trajectory at `path` plus its metadata sidecar, if one exists.
pub fn load_run(path: impl AsRef<Path>) -> Result<LoadedRun, LoadError> {
    let path = path.as_ref();
    let trajectory = load(path)?;
    let metadata = read_metadata(&metadata_path(path))?;
    Ok(LoadedRun {
        trajectory,
        metadata,
    })
}

/// Sidecar location for the artifact at `artifact`.
pub fn metadata_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Record `metadata` next to the artifact at `artifact`.
pub fn write_metadata(artifact: &Path, metadata: &RunMetadata) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(metadata_path(artifact), json)
}

/// Remove a sidecar left by an earlier run.
pub fn clear_metadata(artifact: &Path) -> std::io::Result<()> {
    match fs::remove_file(metadata_path(artifact)) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn read_metadata(path: &Path) -> Result<Option<RunMetadata>, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| LoadError::Metadata {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_trajectory(path: &Path, text: &str) -> Result<Trajectory, LoadError> {
    let mut points = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let point = parse_row(line).ok_or_else(|| LoadError::MalformedData {
            path: path.to_path_buf(),
            line: index + 1,
            content: line.to_string(),
        })?;
        points.push(point);
    }
    Ok(Trajectory::new(points))
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split_whitespace();
    let x = parse_coordinate(fields.next()?)?;
    let y = parse_coordinate(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    Some((x, y))
}

/// Stricter than a plain float parse: `nan` and `inf` rows are malformed,
/// since a diverged sample cannot be plotted against the table.
fn parse_coordinate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}
