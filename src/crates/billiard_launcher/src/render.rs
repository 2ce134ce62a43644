//! Plotting a trajectory against the table outline.
//!
//! [`render`] lays out a [`Plot`]: the boundary circle, the flat wall when the
//! table is semi-circular, and the path as a polyline in time order. The plot
//! serializes to a square SVG so the circle keeps a 1:1 aspect ratio.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::TableGeometry;
use crate::state::SimulationMode;
use crate::trajectory::Trajectory;

/// A trajectory whose lowest point is above this is assumed to be semi-circular.
pub const FLAT_EDGE_TOLERANCE: f64 = -0.1;

const CANVAS_PX: u32 = 600;
const MARGIN: f64 = 1.08;

/// Where the plot's table shape came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSource {
    /// Supplied by the caller, e.g. from the run itself or its metadata.
    Known,
    /// Guessed from the trajectory data.
    Inferred,
}

/// Guess the table shape from the trajectory alone.
///
/// Only a best effort: a circular run that never dips below y = 0 is
/// classified as semi-circular. An empty trajectory counts as circular.
pub fn infer_mode(trajectory: &Trajectory) -> SimulationMode {
    match trajectory.min_y() {
        Some(min_y) if min_y > FLAT_EDGE_TOLERANCE => SimulationMode::SemiCircular,
        _ => SimulationMode::Circular,
    }
}

/// Laid-out picture of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub radius: f64,
    pub mode: SimulationMode,
    pub mode_source: ModeSource,
    pub path: Vec<(f64, f64)>,
}

impl Plot {
    /// Whether the horizontal wall through the origin is drawn.
    pub fn has_flat_edge(&self) -> bool {
        self.mode == SimulationMode::SemiCircular
    }

    /// Half-width of the square viewport, large enough for the table and the path.
    pub fn extent(&self) -> f64 {
        let reach = self
            .path
            .iter()
            .map(|&(x, y)| x.abs().max(y.abs()))
            .fold(self.radius, f64::max);
        reach * MARGIN
    }

    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    pub fn write_svg(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_svg())?;
        debug!(path = %path.display(), "wrote plot");
        Ok(())
    }
}

/// Lay out `trajectory` on the table.
///
/// Pass the run's mode when it is known; with `None` the flat edge is
/// inferred from the data.
pub fn render(trajectory: &Trajectory, geometry: &TableGeometry, mode: Option<SimulationMode>) -> Plot {
    let (mode, mode_source) = match mode {
        Some(mode) => (mode, ModeSource::Known),
        None => {
            let inferred = infer_mode(trajectory);
            warn!(mode = %inferred, "table shape not recorded, inferred from trajectory");
            (inferred, ModeSource::Inferred)
        }
    };

    Plot {
        radius: geometry.radius,
        mode,
        mode_source,
        path: trajectory.points().to_vec(),
    }
}

impl fmt::Display for Plot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extent = self.extent();
        let side = 2.0 * extent;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_PX}" height="{CANVAS_PX}" viewBox="{} {} {side} {side}" preserveAspectRatio="xMidYMid meet">"#,
            -extent, -extent
        )?;
        writeln!(f, r#"  <rect x="{}" y="{}" width="{side}" height="{side}" fill="white"/>"#, -extent, -extent)?;
        // SVG y grows downward; flip so the plot reads like a math plot.
        writeln!(f, r#"  <g transform="scale(1,-1)" fill="none">"#)?;
        writeln!(
            f,
            r#"    <circle class="boundary" cx="0" cy="0" r="{}" stroke="black" stroke-width="{}"/>"#,
            self.radius,
            stroke(extent, 1.5)
        )?;
        if self.has_flat_edge() {
            writeln!(
                f,
                r#"    <line class="flat-edge" x1="{}" y1="0" x2="{extent}" y2="0" stroke="black" stroke-width="{}"/>"#,
                -extent,
                stroke(extent, 1.5)
            )?;
        }
        if !self.path.is_empty() {
            write!(
                f,
                r##"    <polyline class="trajectory" stroke="#1f77b4" stroke-width="{}" points=""##,
                stroke(extent, 1.2)
            )?;
            for (index, (x, y)) in self.path.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{x},{y}")?;
            }
            writeln!(f, r#""/>"#)?;
            let (x0, y0) = self.path[0];
            writeln!(
                f,
                r##"    <circle class="start" cx="{x0}" cy="{y0}" r="{}" fill="#1f77b4"/>"##,
                stroke(extent, 4.0)
            )?;
        }
        writeln!(f, "  </g>")?;
        writeln!(f, "</svg>")
    }
}

/// Convert a pixel width into viewport units.
fn stroke(extent: f64, px: f64) -> f64 {
    px * 2.0 * extent / f64::from(CANVAS_PX)
}
