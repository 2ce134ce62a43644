//! Stand-in for the simulation engine used by process-level tests.
//!
//! Reads one request from stdin, writes a short canned trajectory to
//! `simulation_data.txt` in its working directory and exits 0. Copies the
//! raw request to `received_request.txt` so tests can inspect what arrived.
//!
//! Knobs (environment):
//! - `FAKE_ENGINE_EXIT=<code>` exit with `code` after printing `FAKE_ENGINE_STDERR` to stderr
//! - `FAKE_ENGINE_SKIP_ARTIFACT=1` exit 0 without writing the trajectory
//! - `FAKE_ENGINE_SLEEP_MS=<ms>` sleep before doing anything else

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use billiard_launcher::{EngineRequest, SimulationMode, DEFAULT_ARTIFACT_NAME};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    if let Some(ms) = env_u64("FAKE_ENGINE_SLEEP_MS") {
        thread::sleep(Duration::from_millis(ms));
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    fs::write("received_request.txt", &raw)?;

    if let Some(code) = env_u64("FAKE_ENGINE_EXIT") {
        let message = std::env::var("FAKE_ENGINE_STDERR").unwrap_or_default();
        eprint!("{message}");
        return Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)));
    }

    let state = match EngineRequest::parse(&raw) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("bad request: {err}");
            return Ok(ExitCode::from(1));
        }
    };

    let offsets: [(f64, f64); 3] = match state.mode {
        SimulationMode::Circular => [(1.0, -2.0), (-1.5, 0.5), (0.5, 1.0)],
        SimulationMode::SemiCircular => [(1.0, 0.5), (-1.5, 0.0), (0.5, 1.0)],
    };
    // Keep semi-circular paths on or above the flat wall.
    let floor = match state.mode {
        SimulationMode::Circular => f64::NEG_INFINITY,
        SimulationMode::SemiCircular => 0.0,
    };
    let mut rows = vec![(state.x, state.y)];
    rows.extend(
        offsets
            .iter()
            .map(|&(dx, dy)| (state.x + dx, (state.y + dy).max(floor))),
    );

    println!("Start: {:.2}, {:.2}", state.x, state.y);
    for (index, (x, y)) in rows.iter().enumerate().skip(1) {
        println!("Bounce {index}: x={x:.2}, y={y:.2}");
    }

    if std::env::var_os("FAKE_ENGINE_SKIP_ARTIFACT").is_none() {
        let text: String = rows
            .iter()
            .map(|(x, y)| format!("{x:.6} {y:.6}\n"))
            .collect();
        fs::write(DEFAULT_ARTIFACT_NAME, text)?;
        println!("Done. Data saved to {DEFAULT_ARTIFACT_NAME}");
    }

    Ok(ExitCode::SUCCESS)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}
