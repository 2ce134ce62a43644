use std::cmp::Ordering;

use crate::config::TableGeometry;
use crate::error::ValidationError;
use crate::state::{InitialState, SimulationMode};

/// Check that `state` is a legal starting point on the table.
///
/// Rules run in order and the first failure is returned:
/// the point must lie strictly inside the circle, and on a semi-circular
/// table it must not be below the flat wall. The angle is never checked.
pub fn validate(state: &InitialState, geometry: &TableGeometry) -> Result<(), ValidationError> {
    let dist_sq = state.x * state.x + state.y * state.y;
    let radius_sq = geometry.radius * geometry.radius;

    // Anything but strictly-less fails, including NaN and the boundary itself.
    if dist_sq.partial_cmp(&radius_sq) != Some(Ordering::Less) {
        return Err(ValidationError::OutOfBounds {
            x: state.x,
            y: state.y,
            distance: dist_sq.sqrt(),
            radius: geometry.radius,
        });
    }

    if state.mode == SimulationMode::SemiCircular && state.y < 0.0 {
        return Err(ValidationError::InvalidHemisphere { y: state.y });
    }

    Ok(())
}
