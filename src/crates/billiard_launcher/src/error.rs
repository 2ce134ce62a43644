use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias for launcher operations.
pub type LaunchResult<T> = Result<T, LaunchError>;

/// A form field whose text could not be turned into a usable value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {field}: {value:?} is not {expected}")]
pub struct InputParseError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl InputParseError {
    pub(crate) fn number(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            expected: "a finite number",
        }
    }

    pub(crate) fn mode(value: impl Into<String>) -> Self {
        Self {
            field: "mode",
            value: value.into(),
            expected: "1 (circular) or 2 (semi-circular)",
        }
    }
}

/// Reasons an initial state is not admissible on the table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "position ({x}, {y}) is outside the table: distance from center {distance:.2}, max allowed radius {radius}"
    )]
    OutOfBounds {
        x: f64,
        y: f64,
        distance: f64,
        radius: f64,
    },
    #[error("semi-circular table requires y >= 0, got y = {y}")]
    InvalidHemisphere { y: f64 },
}

/// Errors raised while reading a trajectory artifact.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no trajectory data at {}; run the simulation first", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("malformed trajectory data at {}:{line}: {content:?}", .path.display())]
    MalformedData {
        path: PathBuf,
        line: usize,
        content: String,
    },
    #[error("run metadata at {} is unreadable: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    InputParse(#[from] InputParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not find a simulation engine executable (tried {})", display_paths(.searched))]
    EngineNotFound { searched: Vec<PathBuf> },
    #[error("engine exited with status {exit_code}:\n{stderr}")]
    EngineFailed { exit_code: i32, stderr: String },
    #[error("failed to run engine: {0}")]
    Execution(String),
    #[error("engine did not finish within {0:?} and was terminated")]
    TimedOut(Duration),
    #[error("engine run was cancelled")]
    Cancelled,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write plot: {0}")]
    Render(#[source] io::Error),
}

impl LaunchError {
    pub(crate) fn execution(err: impl Into<String>) -> Self {
        LaunchError::Execution(err.into())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised when engine request text does not follow the stdin protocol.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestParseError {
    #[error("request has {0} lines, expected 4")]
    LineCount(usize),
    #[error("request must end with a newline")]
    MissingTerminator,
    #[error("line {line}: {value:?} is not a valid {field}")]
    Field {
        line: usize,
        field: &'static str,
        value: String,
    },
}
