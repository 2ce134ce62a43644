use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File the engine writes its trajectory to, relative to its working directory.
pub const DEFAULT_ARTIFACT_NAME: &str = "simulation_data.txt";

/// Table dimensions shared by the validator, the engine and the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableGeometry {
    pub radius: f64,
}

impl TableGeometry {
    pub const STANDARD: TableGeometry = TableGeometry { radius: 7.5 };
}

impl Default for TableGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Process-level configuration for locating and launching the engine binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Explicit engine path; skips candidate resolution when set.
    pub binary_path: Option<PathBuf>,
    /// File names tried in order inside the working directory.
    pub candidates: Vec<PathBuf>,
    /// Extra environment variables applied to the child process.
    pub env: BTreeMap<String, String>,
    /// Directory the engine runs in and writes its artifact to.
    pub working_directory: Option<PathBuf>,
    /// Upper bound on the engine's run time. `None` waits indefinitely.
    pub run_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            candidates: default_candidates(),
            env: BTreeMap::new(),
            working_directory: None,
            run_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Create a config targeting a specific engine binary.
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: Some(binary_path.into()),
            ..Self::default()
        }
    }

    /// Add an environment variable override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Override the working directory for the spawned process.
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Kill the engine if it runs longer than `timeout`.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    /// Directory the engine runs in; the current directory when unset.
    pub fn working_dir(&self) -> &Path {
        self.working_directory
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
    }

    /// Where the engine is expected to leave its trajectory.
    pub fn artifact_path(&self) -> PathBuf {
        self.working_dir().join(DEFAULT_ARTIFACT_NAME)
    }

    /// Paths checked, in order, when resolving the engine executable.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        match &self.binary_path {
            Some(path) => vec![path.clone()],
            None => self
                .candidates
                .iter()
                .map(|name| self.working_dir().join(name))
                .collect(),
        }
    }
}

fn default_candidates() -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![PathBuf::from("simulation.exe"), PathBuf::from("simulation")]
    } else {
        vec![PathBuf::from("simulation"), PathBuf::from("simulation.exe")]
    }
}
