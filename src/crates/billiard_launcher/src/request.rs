//! Text protocol spoken on the engine's stdin.
//!
//! A request is exactly four newline-terminated lines, in this order:
//!
//! ```text
//! <mode code>\n<x>\n<y>\n<angle>\n
//! ```
//!
//! The mode code is `1` for a circular and `2` for a semi-circular table.
//! Numbers always carry a decimal point or exponent so the engine's `%lf`
//! reader never sees an ambiguous integer.

use std::fmt;

use crate::error::RequestParseError;
use crate::state::{InitialState, SimulationMode};

/// Encoded request for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest(String);

impl EngineRequest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Decode request text back into the state it was encoded from.
    pub fn parse(text: &str) -> Result<InitialState, RequestParseError> {
        let body = text
            .strip_suffix('\n')
            .ok_or(RequestParseError::MissingTerminator)?;
        let lines: Vec<&str> = body.split('\n').collect();
        let [mode, x, y, angle] = lines.as_slice() else {
            return Err(RequestParseError::LineCount(lines.len()));
        };

        let mode = mode
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(SimulationMode::from_code)
            .ok_or_else(|| field_error(1, "mode code", mode))?;

        Ok(InitialState {
            mode,
            x: parse_number(2, "x", x)?,
            y: parse_number(3, "y", y)?,
            angle: parse_number(4, "angle", angle)?,
        })
    }
}

impl fmt::Display for EngineRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a state into the engine's stdin format.
pub fn encode(state: &InitialState) -> EngineRequest {
    EngineRequest(format!(
        "{}\n{}\n{}\n{}\n",
        state.mode.code(),
        format_number(state.x),
        format_number(state.y),
        format_number(state.angle),
    ))
}

/// Shortest round-trip decimal text, with `.0` appended to whole numbers.
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        format!("{text}.0")
    } else {
        text
    }
}

fn parse_number(line: usize, field: &'static str, text: &str) -> Result<f64, RequestParseError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| field_error(line, field, text))
}

fn field_error(line: usize, field: &'static str, text: &str) -> RequestParseError {
    RequestParseError::Field {
        line,
        field,
        value: text.to_string(),
    }
}
