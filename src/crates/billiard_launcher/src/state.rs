use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputParseError;

/// Shape of the table the ball moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationMode {
    /// Full disk.
    #[default]
    Circular,
    /// Upper half-disk with a flat wall along y = 0.
    SemiCircular,
}

impl SimulationMode {
    /// Integer code used on the engine's stdin.
    pub fn code(self) -> u8 {
        match self {
            SimulationMode::Circular => 1,
            SimulationMode::SemiCircular => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SimulationMode::Circular),
            2 => Some(SimulationMode::SemiCircular),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimulationMode::Circular => "circular",
            SimulationMode::SemiCircular => "semi-circular",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = InputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "circular" | "circle" => Ok(SimulationMode::Circular),
            "2" | "semi-circular" | "semicircular" | "semi" => Ok(SimulationMode::SemiCircular),
            _ => Err(InputParseError::mode(s)),
        }
    }
}

/// Initial conditions for one run. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub mode: SimulationMode,
    pub x: f64,
    pub y: f64,
    /// Launch direction in radians; any value, the engine normalizes it.
    pub angle: f64,
}

impl InitialState {
    pub fn new(mode: SimulationMode, x: f64, y: f64, angle: f64) -> Self {
        Self { mode, x, y, angle }
    }
}

/// Raw field contents as typed by the user.
///
/// Snapshotted at "run" time and converted in one step, so validation and
/// encoding always see the same values.
#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub mode: SimulationMode,
    pub x: String,
    pub y: String,
    pub angle: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Circular,
            x: "2.0".to_string(),
            y: "1.0".to_string(),
            angle: "0.5".to_string(),
        }
    }
}

impl FormInput {
    pub fn new(
        mode: SimulationMode,
        x: impl Into<String>,
        y: impl Into<String>,
        angle: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            x: x.into(),
            y: y.into(),
            angle: angle.into(),
        }
    }

    /// Parse every field, failing on the first one that is not a finite number.
    pub fn parse(&self) -> Result<InitialState, InputParseError> {
        Ok(InitialState {
            mode: self.mode,
            x: parse_field("x", &self.x)?,
            y: parse_field("y", &self.y)?,
            angle: parse_field("angle", &self.angle)?,
        })
    }
}

fn parse_field(field: &'static str, text: &str) -> Result<f64, InputParseError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputParseError::number(field, text)),
    }
}
